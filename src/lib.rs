//! Paginated, role-protected product catalog API.
//!
//! Request flow: route -> auth middleware -> handler -> [`repository`] ->
//! DTO mapping -> [`dtos::pager::Pager`] (listings) -> JSON response.

pub mod auth;
pub mod config;
pub mod database;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod routes;
pub mod state;
pub mod versioning;

use axum::{routing::get, Router};
use http::{HeaderName, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::handlers::errors::not_found;
use crate::handlers::producto::INLINE_COUNT;
use crate::state::AppState;

/// Full application: the API under [`routes::API_BASE`], health check,
/// 404 fallback, CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let api = routes::create_router(state.clone());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            http::header::AUTHORIZATION,
            http::header::CONTENT_TYPE,
            HeaderName::from_static("x-version"),
        ])
        .expose_headers([INLINE_COUNT, http::header::LOCATION]);

    Router::new()
        .route("/", get(|| async { "Productos API" }))
        .route("/health", get(health_check))
        .nest(routes::API_BASE, api)
        .fallback(not_found)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
