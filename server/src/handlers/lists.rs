//! List pages: index, creation, detail, rename and deletion.

use super::{list_not_found, load_list, render, render_invalid};
use crate::state::AppState;
use crate::views::{sort_lists, sort_todos, ListView};
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tera::Context;
use todo_lists_core::validation::validate_list_name;
use todo_lists_core::{ListId, StoreError, TodoList, ValidationError};
use todo_lists_web::{AppError, Session, XhrRequest};

/// Form body for creating or renaming a list.
#[derive(Debug, Deserialize)]
pub struct ListForm {
    /// Requested name, trimmed before validation
    #[serde(default)]
    pub list_name: String,
}

/// `GET /`
#[allow(clippy::unused_async)]
pub async fn home() -> Redirect {
    Redirect::to("/lists")
}

/// `GET /lists`
///
/// # Errors
///
/// Returns an internal error if the store or template fails.
pub async fn index(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let lists: Vec<ListView> = sort_lists(state.store.list_all().await?)
        .into_iter()
        .map(ListView::from)
        .collect();

    let mut context = Context::new();
    context.insert("lists", &lists);
    render(&state, &session, "lists.html", context)
}

/// `GET /lists/new`
///
/// # Errors
///
/// Returns an internal error if the template fails.
#[allow(clippy::unused_async)]
pub async fn new_list(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, AppError> {
    render(&state, &session, "new_list.html", Context::new())
}

/// `POST /lists`
///
/// # Errors
///
/// Returns an internal error if the store or template fails.
pub async fn create_list(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ListForm>,
) -> Result<Response, AppError> {
    let name = form.list_name.trim();

    let outcome = match validate_list_name(state.store.as_ref(), name).await? {
        Some(error) => Err(error),
        None => match state.store.add_list(name).await {
            Ok(id) => Ok(id),
            Err(StoreError::DuplicateListName(_)) => Err(ValidationError::ListNameTaken),
            Err(e) => return Err(e.into()),
        },
    };

    match outcome {
        Ok(id) => {
            tracing::info!(list_id = %id, "List created");
            session.set_success("The list has been created.");
            Ok(Redirect::to("/lists").into_response())
        }
        Err(error) => {
            session.set_error(error.to_string());
            let mut context = Context::new();
            context.insert("list_name", name);
            render_invalid(&state, &session, "new_list.html", context)
        }
    }
}

/// `GET /lists/:id`
///
/// # Errors
///
/// Returns an internal error if the store or template fails.
pub async fn show_list(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Some(list) = load_list(&state, &session, &id).await? else {
        return Ok(list_not_found());
    };

    let context = list_page_context(&state, list).await?;
    Ok(render(&state, &session, "list.html", context)?.into_response())
}

/// Context for the list detail page.
pub(crate) async fn list_page_context(
    state: &AppState,
    list: TodoList,
) -> Result<Context, AppError> {
    let todos = sort_todos(state.store.list_todos(list.id).await?);

    let mut context = Context::new();
    context.insert("list", &ListView::from(list));
    context.insert("todos", &todos);
    Ok(context)
}

/// `GET /lists/:id/edit`
///
/// # Errors
///
/// Returns an internal error if the store or template fails.
pub async fn edit_list(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Some(list) = load_list(&state, &session, &id).await? else {
        return Ok(list_not_found());
    };

    let mut context = Context::new();
    context.insert("list", &ListView::from(list));
    Ok(render(&state, &session, "edit_list.html", context)?.into_response())
}

/// `POST /lists/:id`
///
/// A list cannot be renamed to the name it already has; that name is taken.
///
/// # Errors
///
/// Returns an internal error if the store or template fails.
pub async fn update_list(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Form(form): Form<ListForm>,
) -> Result<Response, AppError> {
    let Some(list) = load_list(&state, &session, &id).await? else {
        return Ok(list_not_found());
    };
    let name = form.list_name.trim();

    let outcome = match validate_list_name(state.store.as_ref(), name).await? {
        Some(error) => Err(error),
        None => match state.store.rename_list(list.id, name).await {
            Ok(()) => Ok(()),
            Err(StoreError::DuplicateListName(_)) => Err(ValidationError::ListNameTaken),
            Err(e) => return Err(e.into()),
        },
    };

    match outcome {
        Ok(()) => {
            tracing::info!(list_id = %list.id, "List renamed");
            session.set_success("The list has been updated.");
            Ok(Redirect::to(&format!("/lists/{}", list.id)).into_response())
        }
        Err(error) => {
            session.set_error(error.to_string());
            let mut context = Context::new();
            context.insert("list", &ListView::from(list));
            context.insert("list_name", name);
            render_invalid(&state, &session, "edit_list.html", context)
        }
    }
}

/// `POST /lists/:id/destroy`
///
/// Script-issued requests get the next location as the body instead of a
/// redirect.
///
/// # Errors
///
/// Returns an internal error if the store fails.
pub async fn destroy_list(
    State(state): State<AppState>,
    session: Session,
    XhrRequest(xhr): XhrRequest,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let Ok(id) = id.parse::<ListId>() else {
        session.set_error(super::LIST_NOT_FOUND);
        return Ok(list_not_found());
    };

    state.store.delete_list(id).await?;
    tracing::info!(list_id = %id, "List deleted");
    session.set_success("The list has been deleted.");

    if xhr {
        Ok("/lists".into_response())
    } else {
        Ok(Redirect::to("/lists").into_response())
    }
}
