//! Domain records for lists and todos.
//!
//! Storage layers map their rows into these types explicitly after every query,
//! so nothing above the store ever reads a column by name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Identity of a [`TodoList`], assigned by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListId(i32);

impl ListId {
    /// Wrap a raw store identity.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw store identity.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ListId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ListId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// Identity of a [`Todo`], assigned by the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(i32);

impl TodoId {
    /// Wrap a raw store identity.
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the raw store identity.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TodoId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// A named list together with the aggregate counts of its todos.
///
/// The counts are not stored; every store query computes them alongside the
/// list row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    /// Store-assigned identity
    pub id: ListId,
    /// Display name, unique among all lists
    pub name: String,
    /// Number of todos in the list
    pub todos_count: i64,
    /// Number of todos not yet completed
    pub todos_remaining_count: i64,
}

impl TodoList {
    /// A list is complete when it has at least one todo and none remain open.
    ///
    /// An empty list is never complete.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.todos_count > 0 && self.todos_remaining_count == 0
    }
}

/// A single actionable item belonging to one list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Store-assigned identity
    pub id: TodoId,
    /// Owning list
    pub list_id: ListId,
    /// Display name
    pub name: String,
    /// Whether the todo has been completed
    pub completed: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn list(todos_count: i64, todos_remaining_count: i64) -> TodoList {
        TodoList {
            id: ListId::new(1),
            name: "Groceries".to_string(),
            todos_count,
            todos_remaining_count,
        }
    }

    #[test]
    fn test_empty_list_is_never_complete() {
        assert!(!list(0, 0).is_complete());
    }

    #[test]
    fn test_list_with_open_todos_is_incomplete() {
        assert!(!list(3, 1).is_complete());
    }

    #[test]
    fn test_list_with_all_todos_done_is_complete() {
        assert!(list(3, 0).is_complete());
    }

    #[test]
    fn test_ids_parse_from_path_segments() {
        assert_eq!("42".parse::<ListId>().unwrap(), ListId::new(42));
        assert_eq!("7".parse::<TodoId>().unwrap(), TodoId::new(7));
        assert!("abc".parse::<ListId>().is_err());
        assert!("".parse::<TodoId>().is_err());
    }

    #[test]
    fn test_ids_display_as_plain_integers() {
        assert_eq!(ListId::new(12).to_string(), "12");
        assert_eq!(format!("/lists/{}/todos/{}", ListId::new(2), TodoId::new(5)), "/lists/2/todos/5");
    }
}
