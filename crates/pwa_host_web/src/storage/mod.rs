//! Browser persistence adapters.

pub mod local_store;
