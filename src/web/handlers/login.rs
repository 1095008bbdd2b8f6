//! Sign-in page handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Form, Path, Query, State},
    http::{HeaderMap, StatusCode, Uri, header::SET_COOKIE},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use crate::application::login_form::LoginFormController;
use crate::domain::callback::{AppOrigin, CallbackTarget};
use crate::domain::entities::Session;
use crate::domain::identity::{FederatedProvider, SignInResult};
use crate::state::AppState;
use crate::web::{redirect, session_cookie};

/// Template for the sign-in page.
///
/// Renders `templates/login.html` with:
/// - Email/password form (email retained after a failed attempt)
/// - Inline error from the last attempt
/// - One button per federated provider
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub error: Option<String>,
    /// Sanitized callback path, posted back in a hidden field.
    pub callback_path: String,
    pub submit_enabled: bool,
    pub providers: Vec<FederatedProvider>,
}

impl LoginTemplate {
    fn from_form(form: &LoginFormController, providers: Vec<FederatedProvider>) -> Self {
        Self {
            email: form.email().to_string(),
            error: form.error_message().map(str::to_string),
            callback_path: form.callback_path().to_string(),
            submit_enabled: form.is_submit_enabled(),
            providers,
        }
    }
}

/// Query string of `GET /login`.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

/// Body of `POST /login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginSubmission {
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Enter your password."))]
    pub password: String,

    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

/// Body of `POST /login/federated/{provider}`.
#[derive(Debug, Deserialize)]
pub struct FederatedSubmission {
    #[serde(rename = "callbackUrl")]
    pub callback_url: Option<String>,
}

fn render(state: &AppState, form: &LoginFormController, status: StatusCode) -> Response {
    let template = LoginTemplate::from_form(form, state.login_service.federated_providers());
    (status, template).into_response()
}

/// Picks the message of the first failing field, email before password.
fn first_validation_message(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();

    ["email", "password"]
        .iter()
        .filter_map(|field| fields.get(*field))
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Check the form and try again.".to_string())
}

/// Redirects to `target` and sets the session cookie.
fn signed_in_response(
    state: &AppState,
    origin: Option<&AppOrigin>,
    session: &Session,
    target: &CallbackTarget,
) -> Response {
    let mut response = redirect::see_other(target.as_str());

    match session_cookie::session_cookie(
        &state.web.session_cookie_name,
        &session.token,
        session.remaining_seconds(),
        state.secure_cookies(origin),
    ) {
        Some(cookie) => {
            response.headers_mut().append(SET_COOKIE, cookie);
        }
        None => tracing::error!("Session token cannot be placed in a cookie"),
    }

    response
}

/// Renders the sign-in page.
///
/// # Endpoint
///
/// `GET /login?callbackUrl=<untrusted>`
///
/// The callback is sanitized to a same-origin path before it is rendered
/// into the form.
pub async fn login_page_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    Query(query): Query<LoginQuery>,
) -> Response {
    let origin = state.request_origin(&headers, &uri);
    let form = LoginFormController::new(query.callback_url.as_deref(), origin.as_ref());

    render(&state, &form, StatusCode::OK)
}

/// Handles a password sign-in.
///
/// # Endpoint
///
/// `POST /login` (form: `email`, `password`, `callbackUrl`)
///
/// # Responses
///
/// - **303 See Other** to the sanitized callback path, with the session cookie
/// - **401 Unauthorized** with the form and the identity service's reason
/// - **422 Unprocessable Entity** with the form when input is invalid
pub async fn login_submit_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
    Form(submission): Form<LoginSubmission>,
) -> Response {
    let origin = state.request_origin(&headers, &uri);
    let validation = submission.validate();

    let mut form = LoginFormController::new(submission.callback_url.as_deref(), origin.as_ref());
    form.set_email(submission.email.trim());
    form.set_password(submission.password);

    if let Err(errors) = validation {
        if let Err(e) = form.reject_input(first_validation_message(&errors)) {
            tracing::warn!(error = %e, "Fresh sign-in form refused input rejection");
        }
        return render(&state, &form, StatusCode::UNPROCESSABLE_ENTITY);
    }

    match state.login_service.submit(&mut form).await {
        Ok(Some(session)) => {
            let target = form
                .navigation_target()
                .cloned()
                .unwrap_or_else(CallbackTarget::root);
            signed_in_response(&state, origin.as_ref(), &session, &target)
        }
        Ok(None) => render(&state, &form, StatusCode::UNAUTHORIZED),
        Err(e) => {
            tracing::warn!(error = %e, "Sign-in submission refused");
            render(&state, &form, StatusCode::CONFLICT)
        }
    }
}

/// Starts a federated sign-in.
///
/// # Endpoint
///
/// `POST /login/federated/{provider}` (form: `callbackUrl`)
///
/// # Responses
///
/// - **303 See Other** to the provider hand-off URL
/// - **401 Unauthorized** with the form when the hand-off cannot start
pub async fn federated_login_handler(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    headers: HeaderMap,
    uri: Uri,
    Form(submission): Form<FederatedSubmission>,
) -> Response {
    let origin = state.request_origin(&headers, &uri);
    let mut form = LoginFormController::new(submission.callback_url.as_deref(), origin.as_ref());

    match state.login_service.federated(&form, &provider).await {
        SignInResult::Redirect(url) => redirect::see_other(url.as_str()),
        SignInResult::Authenticated(session) => {
            let target = form.callback_path().clone();
            signed_in_response(&state, origin.as_ref(), &session, &target)
        }
        SignInResult::Rejected { error } => {
            if let Err(e) = form.reject_input(error) {
                tracing::warn!(error = %e, "Fresh sign-in form refused input rejection");
            }
            render(&state, &form, StatusCode::UNAUTHORIZED)
        }
    }
}
