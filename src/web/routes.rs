//! Web route configuration.

use crate::state::AppState;
use crate::web::handlers::{
    federated_login_handler, home_handler, login_page_handler, login_submit_handler,
    logout_handler,
};
use axum::{
    Router,
    routing::{get, post},
};

/// Where unauthenticated visitors are sent.
pub const LOGIN_PATH: &str = "/login";

/// Pages requiring a signed-in user.
///
/// Protected via [`crate::web::middleware::session_gate`].
///
/// # Endpoints
///
/// - `GET /` - Home page
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/", get(home_handler))
}

/// Public pages.
///
/// # Endpoints
///
/// - `GET /login` - Sign-in page
pub fn public_routes() -> Router<AppState> {
    Router::new().route(LOGIN_PATH, get(login_page_handler))
}

/// Endpoints that start or end a session.
///
/// Kept apart from [`public_routes`] so they can carry a stricter rate limit.
///
/// # Endpoints
///
/// - `POST /login` - Password sign-in
/// - `POST /login/federated/{provider}` - Federated sign-in hand-off
/// - `POST /logout` - Sign-out
pub fn sign_in_routes() -> Router<AppState> {
    Router::new()
        .route(LOGIN_PATH, post(login_submit_handler))
        .route("/login/federated/{provider}", post(federated_login_handler))
        .route("/logout", post(logout_handler))
}
