//! # Todo Lists Server
//!
//! A server-rendered todo list manager. Visitors create named lists, add
//! todos to them, mark todos complete and delete lists or todos. Each page
//! shows a one-time success or error message carried in the visitor's
//! session.
//!
//! ## Layout
//!
//! - [`config`]: environment-driven configuration
//! - [`state`]: shared handler state
//! - [`templates`]: embedded Tera pages
//! - [`views`]: ordering and display helpers for templates
//! - [`handlers`]: one function per route
//! - [`routes`]: the router with its middleware stack

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod templates;
pub mod views;

pub use config::Config;
pub use routes::build_router;
pub use state::AppState;
pub use templates::Templates;
