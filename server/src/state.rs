//! Application state for the HTTP server.
//!
//! Contains all shared resources needed by HTTP handlers:
//! - Todo store (lists and todos)
//! - Compiled page templates
//! - Session store and cookie settings (used by the session layer)

use crate::templates::Templates;
use std::sync::Arc;
use todo_lists_core::TodoStore;
use todo_lists_web::{SessionConfig, SessionStore};

/// Application state shared across all HTTP handlers.
///
/// It's cloned (cheaply via Arc) for each request.
#[derive(Clone)]
pub struct AppState {
    /// Lists and todos
    pub store: Arc<dyn TodoStore>,

    /// Page templates
    pub templates: Arc<Templates>,

    /// Session storage for flash messages
    pub sessions: Arc<dyn SessionStore>,

    /// Session cookie settings
    pub session_config: SessionConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        store: Arc<dyn TodoStore>,
        templates: Arc<Templates>,
        sessions: Arc<dyn SessionStore>,
        session_config: SessionConfig,
    ) -> Self {
        Self {
            store,
            templates,
            sessions,
            session_config,
        }
    }
}
