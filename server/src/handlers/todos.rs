//! Todo actions within a list.

use super::lists::list_page_context;
use super::{list_not_found, load_list, render_invalid};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use todo_lists_core::validation::validate_todo_name;
use todo_lists_core::{ListId, TodoId};
use todo_lists_web::{AppError, Session, XhrRequest};

/// Form body for adding a todo.
#[derive(Debug, Deserialize)]
pub struct TodoForm {
    /// Todo name, trimmed before validation
    #[serde(default)]
    pub todo: String,
}

/// Form body for setting a todo's status.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    /// `"true"` marks the todo completed; any other value reopens it
    #[serde(default)]
    pub completed: String,
}

fn list_location(id: ListId) -> String {
    format!("/lists/{id}")
}

/// `POST /lists/:id/todos`
///
/// # Errors
///
/// Returns an internal error if the store or template fails.
pub async fn create_todo(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<TodoForm>,
) -> Result<Response, AppError> {
    let Some(list) = load_list(&state, &session, &id).await? else {
        return Ok(list_not_found());
    };
    let name = form.todo.trim();

    if let Some(error) = validate_todo_name(name) {
        session.set_error(error.to_string());
        let mut context = list_page_context(&state, list).await?;
        context.insert("todo_name", name);
        return render_invalid(&state, &session, "list.html", context);
    }

    let todo_id = state.store.add_todo(list.id, name).await?;
    tracing::info!(list_id = %list.id, todo_id = %todo_id, "Todo added");
    session.set_success("The todo was added.");
    Ok(Redirect::to(&list_location(list.id)).into_response())
}

/// `POST /lists/:id/todos/:todo_id/destroy`
///
/// Script-issued requests get `204 No Content` and no flash message.
///
/// # Errors
///
/// Returns an internal error if the store fails.
pub async fn destroy_todo(
    State(state): State<AppState>,
    session: Session,
    XhrRequest(xhr): XhrRequest,
    Path((id, todo_id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let Some(list) = load_list(&state, &session, &id).await? else {
        return Ok(list_not_found());
    };
    let Some(todo_id) = parse_todo_id(&session, &todo_id) else {
        return Ok(list_not_found());
    };

    state.store.delete_todo(list.id, todo_id).await?;
    tracing::info!(list_id = %list.id, todo_id = %todo_id, "Todo deleted");

    if xhr {
        Ok(StatusCode::NO_CONTENT.into_response())
    } else {
        session.set_success("The todo has been deleted.");
        Ok(Redirect::to(&list_location(list.id)).into_response())
    }
}

/// `POST /lists/:id/todos/:todo_id`
///
/// # Errors
///
/// Returns an internal error if the store fails.
pub async fn update_todo(
    State(state): State<AppState>,
    session: Session,
    Path((id, todo_id)): Path<(String, String)>,
    Form(form): Form<StatusForm>,
) -> Result<Response, AppError> {
    let Some(list) = load_list(&state, &session, &id).await? else {
        return Ok(list_not_found());
    };
    let Some(todo_id) = parse_todo_id(&session, &todo_id) else {
        return Ok(list_not_found());
    };
    let completed = form.completed == "true";

    state.store.set_todo_status(list.id, todo_id, completed).await?;
    tracing::info!(list_id = %list.id, todo_id = %todo_id, completed, "Todo status set");
    session.set_success("The todo has been updated.");
    Ok(Redirect::to(&list_location(list.id)).into_response())
}

/// `POST /lists/:id/complete_all`
///
/// # Errors
///
/// Returns an internal error if the store fails.
pub async fn complete_all(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Some(list) = load_list(&state, &session, &id).await? else {
        return Ok(list_not_found());
    };

    state.store.complete_all(list.id).await?;
    tracing::info!(list_id = %list.id, "All todos completed");
    session.set_success("All todos have been completed.");
    Ok(Redirect::to(&list_location(list.id)).into_response())
}

/// Ids that do not parse are handled like a missing list.
fn parse_todo_id(session: &Session, raw: &str) -> Option<TodoId> {
    let id: Option<TodoId> = raw.parse().ok();
    if id.is_none() {
        session.set_error(super::LIST_NOT_FOUND);
    }
    id
}
