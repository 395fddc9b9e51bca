//! API route definitions.

use axum::http::{HeaderValue, Method, header};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::ws;

use super::handlers;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/agents/{agent_id}/session",
            post(handlers::get_or_create_session),
        )
        .route("/api/settings", get(handlers::list_settings))
        .route(
            "/api/settings/{key}",
            get(handlers::get_setting).put(handlers::update_setting),
        )
        .route("/api/ws", get(ws::ws_handler))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}

fn build_cors_layer(state: &AppState) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::PUT, Method::OPTIONS];

    let headers = [
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        header::ACCEPT,
        header::ORIGIN,
        header::COOKIE,
        header::HeaderName::from_static("x-user-id"),
    ];

    if state.allowed_origins.is_empty() {
        // With no configured origins, allow common local dev origins.
        tracing::warn!("CORS: no origins configured, using localhost defaults");
        CorsLayer::new()
            .allow_origin([
                "http://localhost:3000".parse::<HeaderValue>().unwrap(),
                "http://localhost:7777".parse::<HeaderValue>().unwrap(),
                "http://127.0.0.1:3000".parse::<HeaderValue>().unwrap(),
                "http://127.0.0.1:7777".parse::<HeaderValue>().unwrap(),
            ])
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true)
    } else {
        let origins: Vec<HeaderValue> = state
            .allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(true)
    }
}
