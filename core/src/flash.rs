//! Per-session flash messages.
//!
//! A [`FlashState`] holds at most one error and one success message. Handlers
//! set them; the page renderer takes them, which clears both so each message is
//! shown exactly once.

use serde::{Deserialize, Serialize};

/// Transient error/success messages for the next rendered page.
///
/// Setting a message overwrites whatever was there (last write wins). There is
/// no queue of messages.
///
/// # Example
///
/// ```
/// use todo_lists_core::FlashState;
///
/// let mut flash = FlashState::default();
/// flash.set_success("The list has been created.");
/// flash.set_success("The list has been updated.");
///
/// let shown = flash.take();
/// assert_eq!(shown.success(), Some("The list has been updated."));
/// assert!(flash.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashState {
    error: Option<String>,
    success: Option<String>,
}

impl FlashState {
    /// Create an empty flash state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            error: None,
            success: None,
        }
    }

    /// Set the error message, replacing any previous one.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    /// Set the success message, replacing any previous one.
    pub fn set_success(&mut self, message: impl Into<String>) {
        self.success = Some(message.into());
    }

    /// Current error message, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Current success message, if any.
    #[must_use]
    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// Returns `true` if neither message is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.error.is_none() && self.success.is_none()
    }

    /// Take both messages for rendering, leaving this state empty.
    #[must_use]
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}
