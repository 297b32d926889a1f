use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use tasklist_core::task::TASKS_BASE_PATH;
use tasklist_core::ApiError;
use tasklist_store::Database;

use crate::config::ServerConfig;
use crate::dispatch::{render_error, render_panic, render_status};
use crate::handlers;
use crate::store::TaskStore;

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: TaskStore,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            store: TaskStore::new(db),
        }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    let no_cache = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, max-age=0"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::EXPIRES,
            HeaderValue::from_static("0"),
        ));

    let collection = get(handlers::list_tasks).post(handlers::create_task);
    let item = get(handlers::get_task)
        .put(handlers::replace_task)
        .patch(handlers::update_task)
        .delete(handlers::delete_task);
    let item_path = format!("{TASKS_BASE_PATH}/{{id}}");

    // Each task route also answers with a trailing slash.
    Router::new()
        .route(TASKS_BASE_PATH, collection.clone())
        .route(&format!("{TASKS_BASE_PATH}/"), collection)
        .route(&item_path, item.clone())
        .route(&format!("{item_path}/"), item)
        // Only the task routes above are marked uncacheable.
        .route_layer(no_cache)
        .route("/health", get(handlers::health))
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
        .layer(CatchPanicLayer::custom(render_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn route_not_found() -> Response {
    render_error(&ApiError::not_found("Route not found"))
}

async fn method_not_allowed() -> Response {
    render_status(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// Bind the listener and serve in the background. Returns a handle to shut it down.
pub async fn start(config: ServerConfig, db: Database) -> Result<ServerHandle, std::io::Error> {
    let router = build_router(AppState::new(db));
    let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(addr = %local_addr, "tasklist server started");

    let server = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "server stopped");
        }
    });

    Ok(ServerHandle {
        port: local_addr.port(),
        server,
    })
}

/// Handle returned by `start()`; keeps the serve task alive.
pub struct ServerHandle {
    pub port: u16,
    server: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Stop accepting connections. In-flight storage calls run to completion.
    pub fn shutdown(self) {
        self.server.abort();
    }
}
