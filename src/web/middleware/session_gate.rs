//! Session gate for pages that require a signed-in user.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{Redirect, Response},
};

use crate::state::AppState;
use crate::web::routes::LOGIN_PATH;
use crate::web::session_cookie;

/// Lets requests with a live session through; redirects everyone else.
///
/// # Authentication Flow
///
/// 1. Read the session cookie
/// 2. Look the session up via [`crate::application::services::SessionService`]
/// 3. On success, insert the [`crate::domain::entities::Session`] into the
///    request extensions and continue to the handler
/// 4. On a missing, unknown or expired session, redirect to `/login`
///
/// Lookup failures are logged and treated like a missing session.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::web::middleware::session_gate;
///
/// let protected = Router::new()
///     .route("/", get(home_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), session_gate::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Redirect> {
    let token = session_cookie::read_token(req.headers(), &st.web.session_cookie_name);

    match st.session_service.current_session(token.as_deref()).await {
        Ok(Some(session)) => {
            tracing::debug!(user_id = %session.user.id, "Session accepted");
            req.extensions_mut().insert(session);
            Ok(next.run(req).await)
        }
        Ok(None) => Err(Redirect::to(LOGIN_PATH)),
        Err(e) => {
            tracing::warn!(error = %e, "Session lookup failed");
            Err(Redirect::to(LOGIN_PATH))
        }
    }
}
