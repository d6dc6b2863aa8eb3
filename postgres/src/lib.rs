//! `PostgreSQL` store for Todo Lists.
//!
//! This crate provides [`PostgresTodoStore`], the production implementation of
//! the `TodoStore` trait from `todo-lists-core`. It uses sqlx with a shared
//! connection pool and supports:
//!
//! - Aggregate todo counts computed in the same query as the list lookup
//! - Cascading list deletion (`ON DELETE CASCADE`)
//! - List-name uniqueness enforced by a `UNIQUE` constraint
//! - Embedded schema migrations
//!
//! # Example
//!
//! ```ignore
//! use todo_lists_postgres::PostgresTodoStore;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = PostgresTodoStore::connect("postgres://localhost/todos").await?;
//!     store.migrate().await?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod store;

pub use store::PostgresTodoStore;
