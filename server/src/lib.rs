//! HTTP service for a SQLite-backed to-do list.
//!
//! # Overview
//! `app` wires the handlers to their routes over an injected `TodoStore`;
//! `run` serves that router on a listener. The binary in `main.rs` owns the
//! store's lifecycle: it opens the database once and hands it to `run`.
//!
//! Routes answer with and without the trailing slash.

pub mod config;
pub mod error;
pub mod handlers;
pub mod store;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use handlers::{agenda, create_todo, delete_todo, get_todo, health, list_todos, update_todo};
pub use store::{StoreError, TodoStore};

pub fn app(store: TodoStore) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .route("/todos/{id}/", get(get_todo).put(update_todo).delete(delete_todo))
        .route("/agenda", get(agenda))
        .route("/agenda/", get(agenda))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

pub async fn run(listener: TcpListener, store: TodoStore) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store)).await
}
