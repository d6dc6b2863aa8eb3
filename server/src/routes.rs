//! Router configuration for the todo lists server.

use crate::handlers::{lists, todos};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use todo_lists_web::handlers::health_check;
use todo_lists_web::{correlation_id_layer, SessionLayer};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// Layers, outermost first: correlation id (request span), HTTP trace,
/// session.
pub fn build_router(state: AppState) -> Router {
    let sessions = SessionLayer::new(state.sessions.clone(), state.session_config.clone());

    Router::new()
        .route("/", get(lists::home))
        .route("/lists", get(lists::index).post(lists::create_list))
        .route("/lists/new", get(lists::new_list))
        .route("/lists/:id", get(lists::show_list).post(lists::update_list))
        .route("/lists/:id/edit", get(lists::edit_list))
        .route("/lists/:id/destroy", post(lists::destroy_list))
        .route("/lists/:id/complete_all", post(todos::complete_all))
        .route("/lists/:id/todos", post(todos::create_todo))
        .route("/lists/:id/todos/:todo_id", post(todos::update_todo))
        .route("/lists/:id/todos/:todo_id/destroy", post(todos::destroy_todo))
        .route("/health", get(health_check))
        .layer(sessions)
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
        .with_state(state)
}
