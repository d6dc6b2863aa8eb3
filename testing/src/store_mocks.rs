//! In-memory store testing utilities
//!
//! Provides fast, deterministic testing infrastructure for anything that talks
//! to a [`TodoStore`]:
//! - [`InMemoryTodoStore`]: `BTreeMap`-based store with the same observable
//!   behavior as the `PostgreSQL` store
//! - A statement log for asserting which operations ran
//! - Failure injection for exercising storage-error paths

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Test utilities document panics where critical

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use todo_lists_core::store::SQL_LOG_TARGET;
use todo_lists_core::{ListId, StoreError, StoreFuture, Todo, TodoId, TodoList, TodoStore};

#[derive(Debug, Default)]
struct Tables {
    lists: BTreeMap<ListId, String>,
    todos: BTreeMap<TodoId, Todo>,
    next_list_id: i32,
    next_todo_id: i32,
    statements: Vec<String>,
    failure: Option<String>,
}

impl Tables {
    /// Record the statement, then fail if a failure has been injected.
    fn execute(&mut self, statement: String) -> Result<(), StoreError> {
        tracing::info!(target: SQL_LOG_TARGET, statement = %statement, "Executing statement");
        self.statements.push(statement);
        match &self.failure {
            Some(message) => Err(StoreError::DatabaseError(message.clone())),
            None => Ok(()),
        }
    }

    fn list_with_counts(&self, id: ListId, name: &str) -> TodoList {
        let todos = self.todos.values().filter(|todo| todo.list_id == id);
        let (count, remaining) = todos.fold((0, 0), |(count, remaining), todo| {
            (count + 1, remaining + i64::from(!todo.completed))
        });
        TodoList {
            id,
            name: name.to_string(),
            todos_count: count,
            todos_remaining_count: remaining,
        }
    }

    fn name_taken(&self, name: &str, except: Option<ListId>) -> bool {
        self.lists
            .iter()
            .any(|(id, existing)| existing == name && Some(*id) != except)
    }
}

/// In-memory [`TodoStore`] for fast, deterministic testing.
///
/// Mirrors the `PostgreSQL` store: ids are assigned sequentially from 1, list
/// names are unique, deleting a list removes its todos, and adding a todo to
/// a missing list fails.
///
/// # Example
///
/// ```
/// use todo_lists_core::TodoStore;
/// use todo_lists_testing::InMemoryTodoStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryTodoStore::new();
/// let list_id = store.add_list("Groceries").await?;
/// store.add_todo(list_id, "Milk").await?;
///
/// let list = store.get_list(list_id).await?.unwrap();
/// assert_eq!(list.todos_count, 1);
/// assert_eq!(store.statements().len(), 3);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryTodoStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryTodoStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every statement executed so far, oldest first.
    #[must_use]
    pub fn statements(&self) -> Vec<String> {
        self.tables.read().unwrap().statements.clone()
    }

    /// Make every following operation fail with [`StoreError::DatabaseError`].
    ///
    /// Statements are still recorded before failing.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.tables.write().unwrap().failure = Some(message.into());
    }

    /// Stop injecting failures.
    pub fn recover(&self) {
        self.tables.write().unwrap().failure = None;
    }

    /// Number of todo rows across all lists.
    ///
    /// Useful for asserting that nothing was orphaned or inserted.
    #[must_use]
    pub fn todo_row_count(&self) -> usize {
        self.tables.read().unwrap().todos.len()
    }
}

impl TodoStore for InMemoryTodoStore {
    fn get_list(&self, id: ListId) -> StoreFuture<'_, Option<TodoList>> {
        Box::pin(async move {
            let mut tables = self.tables.write().unwrap();
            tables.execute(format!("get_list({id})"))?;
            Ok(tables
                .lists
                .get(&id)
                .map(|name| tables.list_with_counts(id, name)))
        })
    }

    fn list_all(&self) -> StoreFuture<'_, Vec<TodoList>> {
        Box::pin(async move {
            let mut tables = self.tables.write().unwrap();
            tables.execute("list_all()".to_string())?;
            let mut lists: Vec<TodoList> = tables
                .lists
                .iter()
                .map(|(id, name)| tables.list_with_counts(*id, name))
                .collect();
            lists.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(lists)
        })
    }

    fn add_list<'a>(&'a self, name: &'a str) -> StoreFuture<'a, ListId> {
        Box::pin(async move {
            let mut tables = self.tables.write().unwrap();
            tables.execute(format!("add_list({name:?})"))?;
            if tables.name_taken(name, None) {
                return Err(StoreError::DuplicateListName(name.to_string()));
            }
            tables.next_list_id += 1;
            let id = ListId::new(tables.next_list_id);
            tables.lists.insert(id, name.to_string());
            Ok(id)
        })
    }

    fn rename_list<'a>(&'a self, id: ListId, name: &'a str) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut tables = self.tables.write().unwrap();
            tables.execute(format!("rename_list({id}, {name:?})"))?;
            if !tables.lists.contains_key(&id) {
                return Ok(());
            }
            if tables.name_taken(name, Some(id)) {
                return Err(StoreError::DuplicateListName(name.to_string()));
            }
            tables.lists.insert(id, name.to_string());
            Ok(())
        })
    }

    fn delete_list(&self, id: ListId) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let mut tables = self.tables.write().unwrap();
            tables.execute(format!("delete_list({id})"))?;
            tables.todos.retain(|_, todo| todo.list_id != id);
            tables.lists.remove(&id);
            Ok(())
        })
    }

    fn add_todo<'a>(&'a self, list_id: ListId, name: &'a str) -> StoreFuture<'a, TodoId> {
        Box::pin(async move {
            let mut tables = self.tables.write().unwrap();
            tables.execute(format!("add_todo({list_id}, {name:?})"))?;
            if !tables.lists.contains_key(&list_id) {
                return Err(StoreError::DatabaseError(format!(
                    "list {list_id} does not exist"
                )));
            }
            tables.next_todo_id += 1;
            let id = TodoId::new(tables.next_todo_id);
            tables.todos.insert(
                id,
                Todo {
                    id,
                    list_id,
                    name: name.to_string(),
                    completed: false,
                },
            );
            Ok(id)
        })
    }

    fn delete_todo(&self, list_id: ListId, todo_id: TodoId) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let mut tables = self.tables.write().unwrap();
            tables.execute(format!("delete_todo({list_id}, {todo_id})"))?;
            if tables
                .todos
                .get(&todo_id)
                .is_some_and(|todo| todo.list_id == list_id)
            {
                tables.todos.remove(&todo_id);
            }
            Ok(())
        })
    }

    fn set_todo_status(
        &self,
        list_id: ListId,
        todo_id: TodoId,
        completed: bool,
    ) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let mut tables = self.tables.write().unwrap();
            tables.execute(format!("set_todo_status({list_id}, {todo_id}, {completed})"))?;
            if let Some(todo) = tables
                .todos
                .get_mut(&todo_id)
                .filter(|todo| todo.list_id == list_id)
            {
                todo.completed = completed;
            }
            Ok(())
        })
    }

    fn complete_all(&self, list_id: ListId) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let mut tables = self.tables.write().unwrap();
            tables.execute(format!("complete_all({list_id})"))?;
            tables
                .todos
                .values_mut()
                .filter(|todo| todo.list_id == list_id)
                .for_each(|todo| todo.completed = true);
            Ok(())
        })
    }

    fn list_todos(&self, list_id: ListId) -> StoreFuture<'_, Vec<Todo>> {
        Box::pin(async move {
            let mut tables = self.tables.write().unwrap();
            tables.execute(format!("list_todos({list_id})"))?;
            Ok(tables
                .todos
                .values()
                .filter(|todo| todo.list_id == list_id)
                .cloned()
                .collect())
        })
    }
}
