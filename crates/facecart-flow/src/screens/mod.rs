//! The three screens of the ordering flow.
//!
//! Screens never draw anything. Every user action returns an [`Outcome`]
//! that the host renders (alerts) and applies (navigation).

pub mod capture;
pub mod catalog;
pub mod order_view;

use facecart_core::Navigation;

pub use capture::{CaptureAction, CaptureScreen};
pub use catalog::{CatalogAction, CatalogScreen};
pub use order_view::{OrderRow, OrderView};

/// A user-facing message box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub(crate) fn error(message: impl Into<String>) -> Self {
        Self::new("Error", message)
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

/// Result of one user action on a screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Another action was in flight; the input had no effect.
    Ignored,
    /// The user dismissed the camera or the name prompt.
    Cancelled,
    /// Stay on the screen and show a message.
    Alert(Alert),
    /// Leave the screen, optionally showing a message on arrival.
    Navigate {
        to: Navigation,
        notice: Option<Alert>,
    },
}

impl Outcome {
    pub(crate) fn navigate(to: Navigation) -> Self {
        Outcome::Navigate { to, notice: None }
    }

    pub fn navigation(&self) -> Option<&Navigation> {
        match self {
            Outcome::Navigate { to, .. } => Some(to),
            _ => None,
        }
    }

    /// The message to show, whether or not the outcome navigates.
    pub fn alert(&self) -> Option<&Alert> {
        match self {
            Outcome::Alert(a) => Some(a),
            Outcome::Navigate { notice, .. } => notice.as_ref(),
            _ => None,
        }
    }
}
