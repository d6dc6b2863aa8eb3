//! Store trait for lists and todos.
//!
//! The [`TodoStore`] owns all persisted state. Every write is fire-and-forget
//! from the caller's perspective: inserts hand back the new id, other writes
//! return nothing, and callers re-fetch whatever they want to show next.
//!
//! # Implementations
//!
//! - `PostgresTodoStore` (in `todo-lists-postgres`): Production implementation
//! - `InMemoryTodoStore` (in `todo-lists-testing`): Fast, deterministic testing
//!
//! # Statement logging
//!
//! Implementations log every statement and its parameters through `tracing`
//! before executing it, under the `todo_lists::sql` target. The record is
//! emitted inside whatever span is current, which for web requests is the
//! per-request span opened by the correlation-id middleware.
//!
//! # Uniqueness
//!
//! List-name uniqueness is checked by callers (see
//! [`validate_list_name`](crate::validation::validate_list_name)) before
//! calling [`TodoStore::add_list`] or [`TodoStore::rename_list`]. That
//! read-then-write is not atomic: two concurrent creates with the same name can
//! both pass validation. Stores that can enforce the constraint themselves
//! report the loser as [`StoreError::DuplicateListName`].

use crate::model::{ListId, Todo, TodoId, TodoList};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Target used for statement log records.
pub const SQL_LOG_TARGET: &str = "todo_lists::sql";

/// Errors that can occur during store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A list with this name already exists.
    ///
    /// Raised by stores that enforce name uniqueness at the storage layer.
    #[error("List name already exists: {0}")]
    DuplicateListName(String),

    /// Database connection or query error.
    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Boxed future returned by [`TodoStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Persistence contract for lists and todos.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; a single store handle is shared by
/// all concurrent requests.
///
/// # Dyn Compatibility
///
/// Methods return [`StoreFuture`] instead of using `async fn` so the store can
/// be held as `Arc<dyn TodoStore>` in application state.
pub trait TodoStore: Send + Sync {
    /// Load one list with its aggregate counts.
    ///
    /// Returns `None` when no list has this id. The counts come from the same
    /// query as the list row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DatabaseError`] if the query fails.
    fn get_list(&self, id: ListId) -> StoreFuture<'_, Option<TodoList>>;

    /// Load every list with its aggregate counts, ordered by name ascending.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DatabaseError`] if the query fails.
    fn list_all(&self) -> StoreFuture<'_, Vec<TodoList>>;

    /// Create a list and return its id.
    ///
    /// # Errors
    ///
    /// - [`StoreError::DuplicateListName`] if the store enforces uniqueness and the name is taken
    /// - [`StoreError::DatabaseError`] if the insert fails
    fn add_list<'a>(&'a self, name: &'a str) -> StoreFuture<'a, ListId>;

    /// Rename a list. Does nothing if the list does not exist.
    ///
    /// # Errors
    ///
    /// - [`StoreError::DuplicateListName`] if the store enforces uniqueness and the name is taken
    /// - [`StoreError::DatabaseError`] if the update fails
    fn rename_list<'a>(&'a self, id: ListId, name: &'a str) -> StoreFuture<'a, ()>;

    /// Delete a list together with all of its todos.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DatabaseError`] if the delete fails.
    fn delete_list(&self, id: ListId) -> StoreFuture<'_, ()>;

    /// Add an open todo to a list and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DatabaseError`] if the insert fails, including when
    /// the list does not exist.
    fn add_todo<'a>(&'a self, list_id: ListId, name: &'a str) -> StoreFuture<'a, TodoId>;

    /// Delete a todo, scoped to its owning list.
    ///
    /// A todo id that belongs to a different list is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DatabaseError`] if the delete fails.
    fn delete_todo(&self, list_id: ListId, todo_id: TodoId) -> StoreFuture<'_, ()>;

    /// Mark a todo completed or open, scoped to its owning list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DatabaseError`] if the update fails.
    fn set_todo_status(
        &self,
        list_id: ListId,
        todo_id: TodoId,
        completed: bool,
    ) -> StoreFuture<'_, ()>;

    /// Mark every todo in a list completed. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DatabaseError`] if the update fails.
    fn complete_all(&self, list_id: ListId) -> StoreFuture<'_, ()>;

    /// Load the todos of a list, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DatabaseError`] if the query fails.
    fn list_todos(&self, list_id: ListId) -> StoreFuture<'_, Vec<Todo>>;
}
