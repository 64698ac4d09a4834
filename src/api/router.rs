use axum::{
    Router,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::handlers::{
    AppState, add_book, create_list, delete_list, get_book, get_list, get_lists, get_share_url,
    remove_book, search, update_list,
};

/// Creates the API router with all list and catalog endpoints
///
/// Catalog (read-only):
/// - GET /search - Search the book catalog
/// - GET /books/:book_id - Fetch one catalog book
///
/// Lists:
/// - POST /lists, GET /lists
/// - GET /lists/:id, PUT /lists/:id, DELETE /lists/:id
/// - POST /lists/:id/books, DELETE /lists/:id/books/:book_id
/// - GET /lists/:id/share
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Catalog
        .route("/search", get(search))
        .route("/books/:book_id", get(get_book))
        // Lists
        .route("/lists", post(create_list).get(get_lists))
        .route(
            "/lists/:id",
            get(get_list).put(update_list).delete(delete_list),
        )
        .route("/lists/:id/books", post(add_book))
        .route("/lists/:id/books/:book_id", delete(remove_book))
        .route("/lists/:id/share", get(get_share_url))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
