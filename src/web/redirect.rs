//! `303 See Other` responses with header-safe `Location` values.

use axum::{
    http::{HeaderValue, StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use url::Url;

/// Redirects to `target` with `303 See Other`.
///
/// Root-relative targets may carry raw non-ASCII characters, which must not
/// reach a `Location` header as raw bytes. Those are percent-encoded by
/// resolving the target against a placeholder base; anything still unusable
/// falls back to `/`.
pub fn see_other(target: &str) -> Response {
    let location = if target.is_ascii() {
        HeaderValue::from_str(target).ok()
    } else {
        encode_relative(target)
    }
    .unwrap_or_else(|| HeaderValue::from_static("/"));

    (StatusCode::SEE_OTHER, [(LOCATION, location)]).into_response()
}

fn encode_relative(target: &str) -> Option<HeaderValue> {
    if !target.starts_with('/') {
        return None;
    }

    let base = Url::parse("http://placeholder.invalid/").ok()?;
    let resolved = base.join(target).ok()?;
    if resolved.host_str() != base.host_str() {
        return None;
    }

    let mut encoded = resolved.path().to_string();
    if let Some(query) = resolved.query() {
        encoded.push('?');
        encoded.push_str(query);
    }
    if let Some(fragment) = resolved.fragment() {
        encoded.push('#');
        encoded.push_str(fragment);
    }

    // Dot segments can collapse into `//host`, which browsers read as another origin
    if encoded.starts_with("//") || encoded.starts_with("/\\") {
        return None;
    }

    HeaderValue::from_str(&encoded).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(response: &Response) -> &str {
        response.headers()[LOCATION].to_str().unwrap()
    }

    #[test]
    fn test_ascii_target_kept() {
        let response = see_other("/dashboard?tab=2");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/dashboard?tab=2");
    }

    #[test]
    fn test_non_ascii_target_encoded() {
        let response = see_other("/spiders/ü");
        assert_eq!(location(&response), "/spiders/%C3%BC");
    }

    #[test]
    fn test_encoding_never_yields_protocol_relative() {
        let response = see_other("/.//evil.com/é");
        assert_eq!(location(&response), "/");

        let response = see_other("/./\\evil.com/é");
        assert_eq!(location(&response), "/");
    }

    #[test]
    fn test_absolute_url_kept() {
        let response = see_other("https://discord.com/oauth2/authorize?callbackUrl=x");
        assert_eq!(
            location(&response),
            "https://discord.com/oauth2/authorize?callbackUrl=x"
        );
    }
}
