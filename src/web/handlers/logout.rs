//! Sign-out handler.

use axum::{
    extract::State,
    http::{HeaderMap, Uri, header::SET_COOKIE},
    response::Response,
};

use crate::state::AppState;
use crate::web::routes::LOGIN_PATH;
use crate::web::{redirect, session_cookie};

/// Ends the current session and returns to the sign-in page.
///
/// # Endpoint
///
/// `POST /logout`
///
/// The cookie is cleared even if the identity service fails to end the
/// session; the failure is logged.
pub async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let token = session_cookie::read_token(&headers, &state.web.session_cookie_name);

    if let Err(e) = state.session_service.sign_out(token.as_deref()).await {
        tracing::error!(error = %e, "Identity service sign-out failed");
    }

    let origin = state.request_origin(&headers, &uri);
    let mut response = redirect::see_other(LOGIN_PATH);

    if let Some(cookie) = session_cookie::clear_session_cookie(
        &state.web.session_cookie_name,
        state.secure_cookies(origin.as_ref()),
    ) {
        response.headers_mut().append(SET_COOKIE, cookie);
    }

    response
}
