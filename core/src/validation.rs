//! Name rules for lists and todos.
//!
//! Names are trimmed by the caller before validation. Lengths are counted in
//! characters, so a 100-character name in any script is accepted.

use crate::model::TodoList;
use crate::store::{StoreError, TodoStore};
use std::ops::RangeInclusive;
use thiserror::Error;

/// Accepted name length, in characters.
pub const NAME_LENGTH: RangeInclusive<usize> = 1..=100;

/// A rejected list or todo name.
///
/// The `Display` output is the message shown to the user.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// List name is empty or longer than 100 characters.
    #[error("List name must be between 1 and 100 characters.")]
    ListNameLength,

    /// Another list already has exactly this name.
    #[error("List name must be unique.")]
    ListNameTaken,

    /// Todo name is empty or longer than 100 characters.
    #[error("Todo must be between 1 and 100 characters.")]
    TodoNameLength,
}

fn has_valid_length(name: &str) -> bool {
    NAME_LENGTH.contains(&name.chars().count())
}

/// Check a list name against the lists that already exist.
///
/// The comparison is exact and case-sensitive.
#[must_use]
pub fn list_name_error(name: &str, existing: &[TodoList]) -> Option<ValidationError> {
    if !has_valid_length(name) {
        Some(ValidationError::ListNameLength)
    } else if existing.iter().any(|list| list.name == name) {
        Some(ValidationError::ListNameTaken)
    } else {
        None
    }
}

/// Validate a list name, reading the existing lists from the store.
///
/// Returns the reason the name is rejected, or `None` if it is acceptable.
/// The length check runs first, so an invalid length never touches the store.
///
/// # Errors
///
/// Returns the store error if the existing lists cannot be loaded.
pub async fn validate_list_name<S>(
    store: &S,
    name: &str,
) -> Result<Option<ValidationError>, StoreError>
where
    S: TodoStore + ?Sized,
{
    if !has_valid_length(name) {
        return Ok(Some(ValidationError::ListNameLength));
    }
    let existing = store.list_all().await?;
    Ok(list_name_error(name, &existing))
}

/// Validate a todo name.
///
/// Returns the reason the name is rejected, or `None` if it is acceptable.
#[must_use]
pub fn validate_todo_name(name: &str) -> Option<ValidationError> {
    if has_valid_length(name) {
        None
    } else {
        Some(ValidationError::TodoNameLength)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ListId;
    use proptest::prelude::*;

    fn existing(names: &[&str]) -> Vec<TodoList> {
        names
            .iter()
            .zip(1..)
            .map(|(name, id)| TodoList {
                id: ListId::new(id),
                name: (*name).to_string(),
                todos_count: 0,
                todos_remaining_count: 0,
            })
            .collect()
    }

    #[test]
    fn test_empty_names_are_rejected() {
        assert_eq!(list_name_error("", &[]), Some(ValidationError::ListNameLength));
        assert_eq!(validate_todo_name(""), Some(ValidationError::TodoNameLength));
    }

    #[test]
    fn test_boundary_lengths() {
        let hundred = "a".repeat(100);
        let hundred_one = "a".repeat(101);
        assert_eq!(list_name_error(&hundred, &[]), None);
        assert_eq!(validate_todo_name(&hundred), None);
        assert_eq!(list_name_error(&hundred_one, &[]), Some(ValidationError::ListNameLength));
        assert_eq!(validate_todo_name(&hundred_one), Some(ValidationError::TodoNameLength));
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let name = "é".repeat(100);
        assert!(name.len() > 100);
        assert_eq!(validate_todo_name(&name), None);
    }

    #[test]
    fn test_duplicate_list_name_is_rejected() {
        let lists = existing(&["Groceries", "Chores"]);
        assert_eq!(list_name_error("Groceries", &lists), Some(ValidationError::ListNameTaken));
    }

    #[test]
    fn test_uniqueness_is_case_sensitive() {
        let lists = existing(&["Groceries"]);
        assert_eq!(list_name_error("groceries", &lists), None);
    }

    #[test]
    fn test_length_error_wins_over_uniqueness() {
        let lists = existing(&[""]);
        assert_eq!(list_name_error("", &lists), Some(ValidationError::ListNameLength));
    }

    #[test]
    fn test_messages_match_user_facing_text() {
        assert_eq!(
            ValidationError::ListNameLength.to_string(),
            "List name must be between 1 and 100 characters."
        );
        assert_eq!(ValidationError::ListNameTaken.to_string(), "List name must be unique.");
        assert_eq!(
            ValidationError::TodoNameLength.to_string(),
            "Todo must be between 1 and 100 characters."
        );
    }

    proptest! {
        #[test]
        fn prop_names_within_bounds_are_accepted(name in "[a-zA-Z0-9 ]{1,100}") {
            prop_assert_eq!(validate_todo_name(&name), None);
            prop_assert_eq!(list_name_error(&name, &[]), None);
        }

        #[test]
        fn prop_names_over_limit_are_rejected(name in "[a-z]{101,200}") {
            prop_assert_eq!(validate_todo_name(&name), Some(ValidationError::TodoNameLength));
            prop_assert_eq!(list_name_error(&name, &[]), Some(ValidationError::ListNameLength));
        }

        #[test]
        fn prop_every_existing_name_is_taken(names in proptest::collection::vec("[a-z]{1,20}", 1..10)) {
            let refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let lists = existing(&refs);
            for name in &names {
                prop_assert_eq!(list_name_error(name, &lists), Some(ValidationError::ListNameTaken));
            }
        }
    }
}
