//! Session cookie parsing and `Set-Cookie` construction.

use axum::http::{HeaderMap, HeaderValue, header::COOKIE};

/// Extracts the value of cookie `name` from the `Cookie` header(s).
///
/// # Cookie Parsing
///
/// Handles multiple cookies in one header by:
/// - Splitting on semicolons
/// - Extracting the `name=value` pair
/// - Ignoring other cookies
pub fn read_token(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|cookie_header| cookie_header.to_str().ok())
        .flat_map(|cookie_str| cookie_str.split(';'))
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(key), Some(value)) if key == name && !value.is_empty() => {
                    Some(value.trim_matches('"').to_string())
                }
                _ => None,
            }
        })
}

/// Builds the `Set-Cookie` value carrying a new session token.
///
/// `HttpOnly; SameSite=Lax; Path=/`, plus `Secure` on https origins.
/// Returns `None` if the token cannot be placed in a header.
pub fn session_cookie(
    name: &str,
    token: &str,
    max_age_seconds: i64,
    secure: bool,
) -> Option<HeaderValue> {
    let mut cookie = format!(
        "{name}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        max_age_seconds.max(0)
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).ok()
}

/// Builds the `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(name: &str, secure: bool) -> Option<HeaderValue> {
    session_cookie(name, "", 0, secure)
}
