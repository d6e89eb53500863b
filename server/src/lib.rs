//! # todo-server
//!
//! JSON CRUD service for a single `todo` table.
//!
//! | Method | Path        | Success                  | Failure                |
//! |--------|-------------|--------------------------|------------------------|
//! | GET    | `/todo`     | 200 `[Todo]`             | 404 empty, 500         |
//! | POST   | `/todo`     | 201 `{message,insertId}` | 400, 422, 500          |
//! | PUT    | `/todo/:id` | 200 `{message}`          | 400, 404, 422, 500     |
//! | DELETE | `/todo/:id` | 200 `{message}`          | 404, 500               |
//! | *      | other       |                          | 404 `Route not found`  |
//!
//! ## Middleware stack (execution order)
//!
//! ```text
//! TraceLayer → enforce_origin → CorsLayer → router / fallback
//! ```

pub mod config;
pub mod cors;
pub mod db;
pub mod error;
pub mod routes;
pub mod store;

use axum::middleware::from_fn_with_state;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use cors::AllowedOrigins;
pub use store::{MemoryStore, MySqlStore, StoreError, TodoStore, WriteOutcome};

/// Assemble the router around an injected store.
pub fn app<S: TodoStore>(store: S, origins: AllowedOrigins) -> Router {
    Router::new()
        .merge(routes::router::<S>())
        .fallback(routes::route_not_found)
        .method_not_allowed_fallback(routes::route_not_found)
        .layer(origins.cors_layer())
        .layer(from_fn_with_state(origins, cors::enforce_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

/// Serve until the listener fails. Used by tests that need a real socket.
pub async fn run<S: TodoStore>(
    listener: TcpListener,
    store: S,
    origins: AllowedOrigins,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store, origins)).await
}
