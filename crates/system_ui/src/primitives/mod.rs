//! Shared control and feedback primitives.

use leptos::ev::MouseEvent;
use leptos::*;

mod controls;
mod feedback;

pub use controls::{Button, FloatingActionButton};
pub use feedback::{Banner, Snackbar};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Shared button variants.
pub enum ButtonVariant {
    /// Standard action button.
    #[default]
    Standard,
    /// Primary emphasized action button.
    Primary,
    /// Quiet text-style button.
    Quiet,
}

impl ButtonVariant {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Primary => "primary",
            Self::Quiet => "quiet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Shared button sizing tokens.
pub enum ButtonSize {
    /// Dense button.
    Sm,
    /// Default button.
    #[default]
    Md,
    /// Large button.
    Lg,
}

impl ButtonSize {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Semantic tone of snackbars and banners.
pub enum FeedbackTone {
    /// Neutral information.
    #[default]
    Info,
    /// Completed action.
    Success,
    /// Failed or blocked action.
    Warning,
}

impl FeedbackTone {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
        }
    }

    /// Warnings interrupt assistive technology; everything else waits politely.
    pub(crate) fn aria_live(self) -> &'static str {
        match self {
            Self::Warning => "assertive",
            Self::Info | Self::Success => "polite",
        }
    }
}

pub(crate) fn merge_layout_class(base: &'static str, layout_class: Option<&'static str>) -> String {
    match layout_class {
        Some(layout_class) if !layout_class.is_empty() => format!("{base} {layout_class}"),
        _ => base.to_string(),
    }
}

pub(crate) fn bool_token(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

pub(crate) fn forward_click(handler: Option<Callback<MouseEvent>>) -> impl Fn(MouseEvent) {
    move |ev| {
        if let Some(handler) = handler.as_ref() {
            handler.call(ev);
        }
    }
}
