//! # Todo Lists Core
//!
//! Domain types and contracts shared by every crate in the Todo Lists workspace.
//!
//! This crate has no I/O of its own. It defines:
//!
//! - **Model**: [`TodoList`] and [`Todo`] records with strongly typed ids
//! - **Store**: the [`TodoStore`] trait, implemented by `PostgresTodoStore`
//!   (production) and `InMemoryTodoStore` (tests)
//! - **Validation**: name rules for lists and todos
//! - **Flash**: the per-session [`FlashState`] message holder
//!
//! ## Example
//!
//! ```ignore
//! use todo_lists_core::{validation, TodoStore};
//!
//! async fn create(store: &dyn TodoStore, name: &str) -> Result<(), Box<dyn std::error::Error>> {
//!     let name = name.trim();
//!     if let Some(error) = validation::validate_list_name(store, name).await? {
//!         return Err(error.into());
//!     }
//!     store.add_list(name).await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod flash;
pub mod model;
pub mod store;
pub mod validation;

pub use flash::FlashState;
pub use model::{ListId, Todo, TodoId, TodoList};
pub use store::{StoreError, StoreFuture, TodoStore};
pub use validation::ValidationError;
