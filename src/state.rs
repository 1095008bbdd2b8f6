//! Shared application state injected into handlers.

use axum::http::{HeaderMap, Uri};
use std::sync::Arc;

use crate::application::services::{LoginService, SessionService};
use crate::config::Config;
use crate::domain::callback::AppOrigin;
use crate::domain::identity::IdentityProvider;
use crate::utils::request_origin::resolve_request_origin;

/// Web-facing settings derived from [`Config`].
#[derive(Debug, Clone)]
pub struct WebSettings {
    pub public_origin: Option<AppOrigin>,
    pub behind_proxy: bool,
    pub session_cookie_name: String,
}

impl From<&Config> for WebSettings {
    fn from(config: &Config) -> Self {
        Self {
            public_origin: config.public_origin.clone(),
            behind_proxy: config.behind_proxy,
            session_cookie_name: config.session_cookie_name.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub login_service: Arc<LoginService>,
    pub session_service: Arc<SessionService>,
    pub web: Arc<WebSettings>,
}

impl AppState {
    /// Wires both services to the same identity provider.
    pub fn new(identity: Arc<dyn IdentityProvider>, web: WebSettings) -> Self {
        Self {
            login_service: Arc::new(LoginService::new(identity.clone())),
            session_service: Arc::new(SessionService::new(identity)),
            web: Arc::new(web),
        }
    }

    /// Origin of the current request, see [`resolve_request_origin`].
    pub fn request_origin(&self, headers: &HeaderMap, uri: &Uri) -> Option<AppOrigin> {
        resolve_request_origin(
            self.web.public_origin.as_ref(),
            headers,
            uri,
            self.web.behind_proxy,
        )
    }

    /// Whether cookies should carry the `Secure` attribute for this origin.
    pub fn secure_cookies(&self, origin: Option<&AppOrigin>) -> bool {
        origin.is_some_and(AppOrigin::is_secure)
    }
}
