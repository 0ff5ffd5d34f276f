//! REST backend for a single collection of todo items.
//!
//! # Overview
//! An in-memory [`store::MemoryStore`] behind the [`store::TodoRepository`]
//! trait, exposed over HTTP at `/todos` and `/todos/{id}`. Every response
//! passes through the [`middleware`] chain: request logging, the JSON
//! content type, then CORS with preflight short-circuit.
//!
//! # Design
//! - The store is constructed explicitly and handed to the router; there is
//!   no process-wide instance.
//! - Request bodies are not size-limited.
//! - Item urls are computed per response from the request's scheme and
//!   `Host`, never stored.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod middleware;
pub mod model;
pub mod store;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware::from_fn, routing::get, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;

pub use config::ServerConfig;
pub use dispatch::{ResourceBase, SharedStore, TlsConnection};
pub use error::{ApiError, ConfigError, ServerError, StoreError};
pub use model::{NewTodo, Todo, TodoId, TodoPatch, TodoRepresentation};
pub use store::{MemoryStore, TodoRepository};

/// Router backed by a fresh in-memory store.
pub fn app() -> Router {
    app_with_store(Arc::new(MemoryStore::new()))
}

/// Router backed by the given store.
pub fn app_with_store(store: SharedStore) -> Router {
    let collection = get(dispatch::list_todos)
        .post(dispatch::create_todo)
        .delete(dispatch::delete_all_todos)
        .fallback(dispatch::method_not_allowed);
    let item = get(dispatch::get_todo)
        .patch(dispatch::update_todo)
        .delete(dispatch::delete_todo)
        .fallback(dispatch::method_not_allowed);

    Router::new()
        .route("/todos", collection.clone())
        .route("/todos/", collection)
        .route("/todos/{id}", item)
        .fallback(dispatch::not_found)
        .with_state(store)
        // Titles have no length limit, so neither do bodies.
        .layer(DefaultBodyLimit::disable())
        .layer(
            ServiceBuilder::new()
                .layer(from_fn(middleware::log_requests))
                .layer(from_fn(middleware::json_content_type))
                .layer(from_fn(middleware::cors)),
        )
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_store(listener: TcpListener, store: SharedStore) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_store(store)).await
}
