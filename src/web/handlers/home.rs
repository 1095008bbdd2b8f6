//! Home page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Extension, response::IntoResponse};

use crate::domain::entities::Session;

/// Template for the home page.
///
/// Renders `templates/home.html` with the signed-in user and a sign-out form.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub display_name: String,
    pub email: String,
    pub expires_at: String,
}

/// Renders the home page for the signed-in user.
///
/// # Endpoint
///
/// `GET /`
///
/// # Authentication
///
/// Gated by [`crate::web::middleware::session_gate`], which redirects
/// visitors without a live session to `/login` and hands the session over
/// as a request extension.
pub async fn home_handler(Extension(session): Extension<Session>) -> impl IntoResponse {
    HomeTemplate {
        display_name: session.user.display_name().to_string(),
        email: session.user.email.clone(),
        expires_at: session.expires_at.format("%Y-%m-%d %H:%M UTC").to_string(),
    }
}
