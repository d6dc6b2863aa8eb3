//! Axum integration for Todo Lists.
//!
//! This crate holds the HTTP plumbing that is independent of the pages the
//! application renders:
//!
//! - [`AppError`]: maps failures to HTML error responses
//! - [`XhrRequest`]: detects script-issued requests
//! - [`correlation_id_layer`]: one tracing span per request
//! - [`session`]: cookie-keyed server-side sessions holding flash messages
//! - [`handlers::health_check`]: liveness probe
//!
//! # Request Flow
//!
//! 1. **Correlation layer** opens the request span
//! 2. **Session layer** loads the visitor's flash messages
//! 3. **Handler** talks to the `TodoStore`, sets flash messages, renders or redirects
//! 4. **Session layer** saves the flash messages and issues the cookie if needed
//!
//! # Example
//!
//! ```ignore
//! use todo_lists_web::{correlation_id_layer, session::SessionLayer, AppError, Session};
//! use axum::{Router, routing::post, response::Redirect};
//!
//! async fn complete_all(session: Session) -> Result<Redirect, AppError> {
//!     store.complete_all(list_id).await?;
//!     session.set_success("All todos have been completed.");
//!     Ok(Redirect::to("/lists/1"))
//! }
//!
//! let app = Router::new()
//!     .route("/lists/:id/complete_all", post(complete_all))
//!     .layer(SessionLayer::new(sessions, SessionConfig::default()))
//!     .layer(correlation_id_layer());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod session;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::XhrRequest;
pub use middleware::{correlation_id_layer, CorrelationId, CORRELATION_ID_HEADER};
pub use session::{
    InMemorySessionStore, Session, SessionConfig, SessionLayer, SessionStore,
};
