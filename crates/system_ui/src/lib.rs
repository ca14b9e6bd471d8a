//! Shared UI primitive library for the site and its PWA prompts.
//!
//! The crate owns reusable Leptos primitives and the stable `data-ui-*` DOM contract consumed
//! by the site stylesheet. Prompt components should compose these primitives instead of
//! emitting ad hoc control markup.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod primitives;

pub use primitives::{
    Banner, Button, ButtonSize, ButtonVariant, FeedbackTone, FloatingActionButton, Snackbar,
};

/// Convenience imports for crates consuming the shared primitive set.
pub mod prelude {
    pub use crate::{
        Banner, Button, ButtonSize, ButtonVariant, FeedbackTone, FloatingActionButton, Snackbar,
    };
}
