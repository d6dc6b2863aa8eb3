//! # Todo Lists Testing
//!
//! Testing utilities for the Todo Lists workspace.
//!
//! This crate provides:
//! - [`InMemoryTodoStore`]: a deterministic, in-memory `TodoStore`
//! - Statement logging and failure injection for assertions on storage behavior
//!
//! ## Example
//!
//! ```ignore
//! use todo_lists_testing::InMemoryTodoStore;
//! use std::sync::Arc;
//!
//! #[tokio::test]
//! async fn test_create_list_flow() {
//!     let store = Arc::new(InMemoryTodoStore::new());
//!     let app = build_router(AppState::new(store.clone(), sessions, templates));
//!
//!     // drive the router, then inspect the store
//!     assert_eq!(store.list_all().await.unwrap().len(), 1);
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod store_mocks;

pub use store_mocks::InMemoryTodoStore;
