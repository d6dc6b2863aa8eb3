//! View helpers for page templates.

use serde::Serialize;
use todo_lists_core::{ListId, Todo, TodoList};

/// CSS class for a list row.
#[must_use]
pub const fn list_class(list: &TodoList) -> Option<&'static str> {
    if list.is_complete() { Some("complete") } else { None }
}

/// Incomplete lists first, then complete ones. Order within each group is kept.
#[must_use]
pub fn sort_lists(lists: Vec<TodoList>) -> Vec<TodoList> {
    let (complete, mut incomplete): (Vec<_>, Vec<_>) =
        lists.into_iter().partition(TodoList::is_complete);
    incomplete.extend(complete);
    incomplete
}

/// Incomplete todos first, then completed ones. Order within each group is kept.
#[must_use]
pub fn sort_todos(todos: Vec<Todo>) -> Vec<Todo> {
    let (completed, mut open): (Vec<_>, Vec<_>) =
        todos.into_iter().partition(|todo| todo.completed);
    open.extend(completed);
    open
}

/// A list as templates see it.
#[derive(Debug, Clone, Serialize)]
pub struct ListView {
    /// List identity
    pub id: ListId,
    /// Display name
    pub name: String,
    /// Number of todos
    pub todos_count: i64,
    /// Number of open todos
    pub todos_remaining_count: i64,
    /// Row CSS class
    pub class: Option<&'static str>,
}

impl From<TodoList> for ListView {
    fn from(list: TodoList) -> Self {
        let class = list_class(&list);
        Self {
            id: list.id,
            name: list.name,
            todos_count: list.todos_count,
            todos_remaining_count: list.todos_remaining_count,
            class,
        }
    }
}
