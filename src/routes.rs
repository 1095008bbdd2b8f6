//! Top-level router configuration combining page and health routes.
//!
//! # Route Structure
//!
//! - `GET  /`                              - Home page (session required)
//! - `GET  /login`                         - Sign-in page (public)
//! - `POST /login`                         - Password sign-in
//! - `POST /login/federated/{provider}`    - Federated sign-in hand-off
//! - `POST /logout`                        - Sign-out
//! - `GET  /health`                        - Health check (public)
//! - `/static/*`                           - Static assets
//! - anything else                         - JSON `404 Not Found`
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket, stricter on sign-in endpoints
//! - **Session gate** - Cookie session check on protected pages
//! - **Path normalization** - Trailing slash handling

use crate::api::handlers::{fallback_handler, health_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::state::AppState;
use crate::web;
use crate::web::middleware::session_gate;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeDir;

/// Constructs the application router with all routes and middleware.
///
/// Rate limiting keys on the peer address, so the returned service must be
/// served with `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let protected = web::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_gate::layer,
        ))
        .layer(rate_limit::layer());

    let public = web::routes::public_routes().layer(rate_limit::layer());

    let sign_in = web::routes::sign_in_routes().layer(rate_limit::secure_layer());

    let router = Router::new()
        .merge(protected)
        .merge(public)
        .merge(sign_in)
        .route("/health", get(health_handler))
        .nest_service("/static", ServeDir::new("static"))
        .fallback(fallback_handler)
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
