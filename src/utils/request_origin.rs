//! Application origin resolution from configuration or request headers.

use axum::http::uri::Authority;
use axum::http::{HeaderMap, Uri, header};

use crate::domain::callback::AppOrigin;

/// Header a trusted reverse proxy uses to report the client-facing scheme.
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Resolves the origin the current request was addressed to.
///
/// Priority:
/// 1. The configured `PUBLIC_ORIGIN`
/// 2. The `Host` header, or the request URI authority when there is none
///    (HTTP/2 carries the host in `:authority`)
///
/// The scheme comes from `X-Forwarded-Proto` when `behind_proxy` is set,
/// then from the request URI, and is `http` otherwise.
///
/// Returns `None` if no host is usable; callers then treat the origin as
/// unknown and fall back to the application root.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert(header::HOST, "localhost:3000".parse().unwrap());
///
/// let uri = Uri::from_static("/login");
/// let origin = resolve_request_origin(None, &headers, &uri, false).unwrap();
/// assert_eq!(origin.to_string(), "http://localhost:3000");
/// ```
pub fn resolve_request_origin(
    configured: Option<&AppOrigin>,
    headers: &HeaderMap,
    uri: &Uri,
    behind_proxy: bool,
) -> Option<AppOrigin> {
    if let Some(origin) = configured {
        return Some(origin.clone());
    }

    let host = match headers.get(header::HOST) {
        Some(value) => value.to_str().ok()?.trim().to_string(),
        None => authority_host(uri.authority()?),
    };
    if host.is_empty() {
        return None;
    }

    let scheme = forwarded_proto(headers, behind_proxy)
        .or_else(|| uri.scheme_str().and_then(known_scheme))
        .unwrap_or_else(|| "http".to_string());

    match AppOrigin::from_host(&scheme, &host) {
        Ok(origin) => Some(origin),
        Err(e) => {
            tracing::debug!(host = %host, error = %e, "Request host does not form an origin");
            None
        }
    }
}

/// `host[:port]` of an authority, without user info.
fn authority_host(authority: &Authority) -> String {
    match authority.port() {
        Some(port) => format!("{}:{}", authority.host(), port),
        None => authority.host().to_string(),
    }
}

fn forwarded_proto(headers: &HeaderMap, behind_proxy: bool) -> Option<String> {
    if !behind_proxy {
        return None;
    }

    headers
        .get(X_FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        // Proxies may append: "https, http"
        .and_then(|v| v.split(',').next())
        .and_then(known_scheme)
}

fn known_scheme(raw: &str) -> Option<String> {
    let scheme = raw.trim().to_ascii_lowercase();
    (scheme == "http" || scheme == "https").then_some(scheme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, Uri, header};

    fn headers(host: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static(host));
        headers
    }

    fn path() -> Uri {
        Uri::from_static("/login")
    }

    #[test]
    fn test_configured_origin_wins() {
        let configured = AppOrigin::parse("https://moltly.app").unwrap();
        let origin =
            resolve_request_origin(Some(&configured), &headers("evil.com"), &path(), false);

        assert_eq!(origin, Some(configured));
    }

    #[test]
    fn test_origin_from_host() {
        let origin =
            resolve_request_origin(None, &headers("localhost:3000"), &path(), false).unwrap();
        assert_eq!(origin.to_string(), "http://localhost:3000");
    }

    #[test]
    fn test_origin_from_ipv6_host() {
        let origin = resolve_request_origin(None, &headers("[::1]:8080"), &path(), false).unwrap();
        assert_eq!(origin.to_string(), "http://[::1]:8080");
    }

    #[test]
    fn test_forwarded_proto_behind_proxy() {
        let mut headers = headers("moltly.app");
        headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("https, http"));

        let origin = resolve_request_origin(None, &headers, &path(), true).unwrap();
        assert_eq!(origin.to_string(), "https://moltly.app");
    }

    #[test]
    fn test_forwarded_proto_ignored_without_proxy() {
        let mut headers = headers("moltly.app");
        headers.insert(X_FORWARDED_PROTO, HeaderValue::from_static("https"));

        let origin = resolve_request_origin(None, &headers, &path(), false).unwrap();
        assert_eq!(origin.to_string(), "http://moltly.app");
    }

    #[test]
    fn test_missing_host() {
        assert!(resolve_request_origin(None, &HeaderMap::new(), &path(), false).is_none());
    }

    #[test]
    fn test_host_with_path_rejected() {
        let origin = resolve_request_origin(None, &headers("moltly.app/evil"), &path(), false);
        assert!(origin.is_none());
    }

    #[test]
    fn test_origin_from_http2_authority() {
        let uri = Uri::from_static("http://moltly.app:8443/login");
        let origin = resolve_request_origin(None, &HeaderMap::new(), &uri, false).unwrap();
        assert_eq!(origin.to_string(), "http://moltly.app:8443");
    }

    #[test]
    fn test_authority_scheme_and_user_info() {
        let uri = Uri::from_static("https://keeper@moltly.app/login");
        let origin = resolve_request_origin(None, &HeaderMap::new(), &uri, false).unwrap();
        assert_eq!(origin.to_string(), "https://moltly.app");
    }

    #[test]
    fn test_host_header_preferred_over_authority() {
        let uri = Uri::from_static("http://other.example/login");
        let origin = resolve_request_origin(None, &headers("moltly.app"), &uri, false).unwrap();
        assert_eq!(origin.to_string(), "http://moltly.app");
    }
}
