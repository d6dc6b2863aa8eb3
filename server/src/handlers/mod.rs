//! HTTP request handlers.
//!
//! Handlers are organized by resource. Shared page plumbing lives here:
//! - [`load_list`]: resolve the list named in the path, or send the visitor
//!   back to `/lists` with an error
//! - [`render`]: render a page and consume the session's flash messages

pub mod lists;
pub mod todos;

use crate::state::AppState;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tera::Context;
use todo_lists_core::{ListId, TodoList};
use todo_lists_web::{AppError, Session};

/// Flash message for a list id that does not resolve.
pub const LIST_NOT_FOUND: &str = "The specified list was not found.";

/// Load the list with the raw path id.
///
/// Returns `None` after recording the not-found error when the id does not
/// parse or no list has it.
///
/// # Errors
///
/// Returns an internal error if the store fails.
pub async fn load_list(
    state: &AppState,
    session: &Session,
    raw_id: &str,
) -> Result<Option<TodoList>, AppError> {
    let list = match raw_id.parse::<ListId>() {
        Ok(id) => state.store.get_list(id).await?,
        Err(_) => None,
    };

    if list.is_none() {
        tracing::debug!(list_id = raw_id, "List not found");
        session.set_error(LIST_NOT_FOUND);
    }
    Ok(list)
}

/// Redirect for a list that could not be loaded.
#[must_use]
pub fn list_not_found() -> Response {
    Redirect::to("/lists").into_response()
}

/// Render a page, consuming the session's pending flash messages.
///
/// # Errors
///
/// Returns an internal error if the template fails to render.
pub fn render(
    state: &AppState,
    session: &Session,
    template: &str,
    mut context: Context,
) -> Result<Html<String>, AppError> {
    context.insert("flash", &session.take_flash());
    state.templates.render(template, &context)
}

/// Re-render a form page after a validation failure.
///
/// # Errors
///
/// Returns an internal error if the template fails to render.
pub fn render_invalid(
    state: &AppState,
    session: &Session,
    template: &str,
    context: Context,
) -> Result<Response, AppError> {
    let page = render(state, session, template, context)?;
    Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response())
}
