//! Read-only HTTP JSON API over [`SkyClock`](crate::sky::SkyClock).

mod handlers;
mod state;

use axum::http::{header, HeaderValue};
use axum::routing::get;
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

use crate::location::Catalog;
use crate::telemetry::shutdown_signal;

pub use handlers::parse_instant;

pub fn build_router(catalog: Catalog) -> Router {
    let state = Arc::new(AppState { catalog });

    Router::new()
        .route("/api/locations", get(handlers::locations))
        .route("/api/resolve", get(handlers::resolve))
        .route("/api/time", get(handlers::time))
        .route("/api/daytime", get(handlers::daytime))
        .route("/api/sun", get(handlers::sun))
        .route("/api/uv", get(handlers::uv))
        .route("/api/report", get(handlers::report))
        // Values move with the wall clock; clients must not cache them.
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(catalog: Catalog, host: &str, port: u16) -> std::io::Result<()> {
    let app = build_router(catalog);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(%addr, "skyclock server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}
