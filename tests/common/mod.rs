#![allow(dead_code)]

use axum::http::header::SET_COOKIE;
use axum::routing::get;
use axum::{Router, middleware};
use axum_test::{TestResponse, TestServer};
use moltly_web::api::handlers::{fallback_handler, health_handler};
use moltly_web::config::{AccountConfig, FederatedProviderConfig};
use moltly_web::domain::callback::AppOrigin;
use moltly_web::infrastructure::identity::{StaticIdentityProvider, digest_secret};
use moltly_web::state::{AppState, WebSettings};
use moltly_web::web;
use moltly_web::web::middleware::session_gate;
use std::sync::Arc;
use url::Url;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const EMAIL: &str = "keeper@moltly.app";
pub const PASSWORD: &str = "hunter2";
pub const COOKIE_NAME: &str = "moltly_session";
pub const ORIGIN: &str = "https://moltly.app";

pub fn web_settings() -> WebSettings {
    WebSettings {
        public_origin: Some(AppOrigin::parse(ORIGIN).unwrap()),
        behind_proxy: false,
        session_cookie_name: COOKIE_NAME.to_string(),
    }
}

pub fn create_test_state() -> AppState {
    let identity = StaticIdentityProvider::new(
        SIGNING_SECRET.to_string(),
        vec![AccountConfig {
            email: EMAIL.to_string(),
            secret_digest: digest_secret(SIGNING_SECRET, PASSWORD),
            name: Some("Keeper".to_string()),
        }],
        vec![FederatedProviderConfig {
            id: "discord".to_string(),
            name: "Discord".to_string(),
            authorize_url: Url::parse("https://discord.com/oauth2/authorize").unwrap(),
        }],
        3600,
    );

    AppState::new(Arc::new(identity), web_settings())
}

/// All page routes plus `/health`, without rate limiting (no peer address in tests).
pub fn create_test_router(state: AppState) -> Router {
    let protected = web::routes::protected_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        session_gate::layer,
    ));

    Router::new()
        .merge(protected)
        .merge(web::routes::public_routes())
        .merge(web::routes::sign_in_routes())
        .route("/health", get(health_handler))
        .fallback(fallback_handler)
        .with_state(state)
}

pub fn create_test_server() -> TestServer {
    TestServer::new(create_test_router(create_test_state())).unwrap()
}

pub fn location(response: &TestResponse) -> String {
    response.header("location").to_str().unwrap().to_string()
}

/// `name=value` pair of the session cookie set by `response`.
pub fn session_cookie_pair(response: &TestResponse) -> String {
    let set_cookie = response.header(SET_COOKIE);
    let set_cookie = set_cookie.to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

/// Signs in with the test account and returns the `Cookie` header value.
pub async fn sign_in(server: &TestServer) -> String {
    let response = server
        .post("/login")
        .form(&[("email", EMAIL), ("password", PASSWORD), ("callbackUrl", "/")])
        .await;
    response.assert_status(axum::http::StatusCode::SEE_OTHER);

    session_cookie_pair(&response)
}
