//! Post-sign-in callback targets and their sanitization.
//!
//! The `callbackUrl` query parameter is attacker-controlled. Everything that
//! navigates after sign-in goes through [`sanitize_callback_path`], which
//! reduces the raw value to a path on the application's own origin.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use url::Url;

/// Root-relative shape: a single leading `/` not followed by `/` or `\`.
///
/// Browsers treat `/\host` the same as `//host`, so the backslash is excluded
/// alongside the second slash.
static ROOT_RELATIVE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/(?:[^/\\]|$)").unwrap());

/// Errors raised when parsing an application origin.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CallbackError {
    #[error("Invalid origin: {0}")]
    InvalidOrigin(String),

    #[error("Origin must use http or https")]
    UnsupportedScheme,

    #[error("Origin must not carry a path, query or fragment")]
    NotAnOrigin,
}

/// Scheme, host and port the application is served from.
///
/// Stored as a URL whose path is `/`, ready to resolve relative references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppOrigin(Url);

impl AppOrigin {
    /// Parses an origin such as `https://moltly.app` or `http://localhost:3000`.
    ///
    /// # Errors
    ///
    /// Returns [`CallbackError::InvalidOrigin`] for unparsable input or a missing
    /// host, [`CallbackError::UnsupportedScheme`] for anything but http(s) and
    /// [`CallbackError::NotAnOrigin`] when a path, query, fragment or userinfo
    /// is present.
    pub fn parse(input: &str) -> Result<Self, CallbackError> {
        let url = Url::parse(input.trim())
            .map_err(|e| CallbackError::InvalidOrigin(e.to_string()))?;

        match url.scheme() {
            "http" | "https" => {}
            _ => return Err(CallbackError::UnsupportedScheme),
        }

        if url.host_str().is_none() {
            return Err(CallbackError::InvalidOrigin("missing host".to_string()));
        }

        if url.path() != "/"
            || url.query().is_some()
            || url.fragment().is_some()
            || !url.username().is_empty()
            || url.password().is_some()
        {
            return Err(CallbackError::NotAnOrigin);
        }

        Ok(Self(url))
    }

    /// Builds an origin from a request host (`example.com:3000`) and scheme.
    pub fn from_host(scheme: &str, host: &str) -> Result<Self, CallbackError> {
        Self::parse(&format!("{scheme}://{host}"))
    }

    /// Returns true for `https` origins.
    pub fn is_secure(&self) -> bool {
        self.0.scheme() == "https"
    }

    /// Returns true if `url` has the same scheme, host and port.
    pub fn is_same_origin(&self, url: &Url) -> bool {
        url.origin() == self.0.origin()
    }

    /// Resolves a reference against this origin.
    pub fn join(&self, reference: &str) -> Result<Url, url::ParseError> {
        self.0.join(reference)
    }
}

impl FromStr for AppOrigin {
    type Err = CallbackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AppOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.origin().ascii_serialization())
    }
}

/// A same-origin destination (path, query and fragment) to land on after sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackTarget(String);

impl CallbackTarget {
    /// The application root, `/`.
    pub fn root() -> Self {
        Self("/".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Fully-qualified callback URL for collaborators that redirect back by URL.
    ///
    /// Falls back to the relative path when no origin is known.
    pub fn absolute_url(&self, origin: Option<&AppOrigin>) -> String {
        origin
            .and_then(|o| o.join(&self.0).ok())
            .map(|url| url.to_string())
            .unwrap_or_else(|| self.0.clone())
    }
}

impl fmt::Display for CallbackTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CallbackTarget {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_root_relative(raw: &str) -> bool {
    ROOT_RELATIVE_REGEX.is_match(raw) && !raw.chars().any(|c| c.is_ascii_control())
}

/// Reduces an untrusted callback value to a same-origin path.
///
/// # Rules
///
/// 1. Absent or empty input yields `/`
/// 2. Root-relative input (`/path`, not `//host`) is returned unchanged
/// 3. Anything else is resolved against `origin`; a parse failure or a
///    different origin yields `/`, otherwise path + query + fragment
/// 4. Without an origin, non-root-relative input yields `/`
///
/// The result always satisfies rule 2, so sanitizing twice is a no-op.
///
/// # Examples
///
/// ```
/// use moltly_web::domain::callback::{AppOrigin, sanitize_callback_path};
///
/// let origin = AppOrigin::parse("https://moltly.app").unwrap();
///
/// assert_eq!(sanitize_callback_path(Some("/dashboard?tab=2"), Some(&origin)).as_str(), "/dashboard?tab=2");
/// assert_eq!(sanitize_callback_path(Some("//evil.com/steal"), Some(&origin)).as_str(), "/");
/// assert_eq!(sanitize_callback_path(Some("https://evil.com"), Some(&origin)).as_str(), "/");
/// assert_eq!(sanitize_callback_path(None, Some(&origin)).as_str(), "/");
/// ```
pub fn sanitize_callback_path(raw: Option<&str>, origin: Option<&AppOrigin>) -> CallbackTarget {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return CallbackTarget::root(),
    };

    if is_root_relative(raw) {
        return CallbackTarget(raw.to_string());
    }

    let Some(origin) = origin else {
        tracing::debug!("No application origin available, callback reset to root");
        return CallbackTarget::root();
    };

    let resolved = match origin.join(raw) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!(error = %e, "Unparsable callback, reset to root");
            return CallbackTarget::root();
        }
    };

    if !origin.is_same_origin(&resolved) {
        tracing::debug!(
            callback_origin = %resolved.origin().ascii_serialization(),
            "Cross-origin callback rejected"
        );
        return CallbackTarget::root();
    }

    let mut candidate = resolved.path().to_string();
    if let Some(query) = resolved.query() {
        candidate.push('?');
        candidate.push_str(query);
    }
    if let Some(fragment) = resolved.fragment() {
        candidate.push('#');
        candidate.push_str(fragment);
    }

    // `https://app/.//evil.com` resolves to the path `//evil.com`
    if is_root_relative(&candidate) {
        CallbackTarget(candidate)
    } else {
        CallbackTarget::root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> AppOrigin {
        AppOrigin::parse("https://moltly.app").unwrap()
    }

    fn sanitize(raw: Option<&str>) -> String {
        sanitize_callback_path(raw, Some(&origin())).to_string()
    }

    #[test]
    fn test_absent_and_empty_yield_root() {
        assert_eq!(sanitize(None), "/");
        assert_eq!(sanitize(Some("")), "/");
        assert_eq!(sanitize_callback_path(None, None).as_str(), "/");
    }

    #[test]
    fn test_root_relative_unchanged() {
        assert_eq!(sanitize(Some("/")), "/");
        assert_eq!(sanitize(Some("/dashboard?tab=2")), "/dashboard?tab=2");
        assert_eq!(sanitize(Some("/a/b#frag")), "/a/b#frag");
        assert_eq!(sanitize(Some("/spiders/ünïcode")), "/spiders/ünïcode");
    }

    #[test]
    fn test_root_relative_unchanged_without_origin() {
        assert_eq!(
            sanitize_callback_path(Some("/dashboard?tab=2"), None).as_str(),
            "/dashboard?tab=2"
        );
    }

    #[test]
    fn test_protocol_relative_rejected() {
        assert_eq!(sanitize(Some("//evil.com/steal")), "/");
        assert_eq!(sanitize(Some("//evil.com")), "/");
    }

    #[test]
    fn test_backslash_variants_rejected() {
        assert_eq!(sanitize(Some("/\\evil.com")), "/");
        assert_eq!(sanitize(Some("\\\\evil.com")), "/");
    }

    #[test]
    fn test_control_characters_never_fast_path() {
        assert_eq!(sanitize(Some("/\t/evil.com")), "/");
        assert_eq!(sanitize(Some("/\n/evil.com")), "/");
    }

    #[test]
    fn test_foreign_origins_rejected() {
        assert_eq!(sanitize(Some("https://evil.com")), "/");
        assert_eq!(sanitize(Some("http://moltly.app/dashboard")), "/");
        assert_eq!(sanitize(Some("https://moltly.app:8443/dashboard")), "/");
        assert_eq!(sanitize(Some("javascript:alert(1)")), "/");
        assert_eq!(sanitize(Some("data:text/html,hi")), "/");
    }

    #[test]
    fn test_same_origin_absolute_stripped() {
        assert_eq!(
            sanitize(Some("https://moltly.app/dashboard?tab=2#top")),
            "/dashboard?tab=2#top"
        );
        assert_eq!(sanitize(Some("https://MOLTLY.app")), "/");
    }

    #[test]
    fn test_relative_reference_resolved() {
        assert_eq!(sanitize(Some("dashboard")), "/dashboard");
        assert_eq!(sanitize(Some("?tab=2")), "/?tab=2");
    }

    #[test]
    fn test_resolved_double_slash_path_rejected() {
        assert_eq!(sanitize(Some("https://moltly.app/.//evil.com")), "/");
    }

    #[test]
    fn test_no_origin_rejects_non_root_relative() {
        assert_eq!(
            sanitize_callback_path(Some("https://moltly.app/dashboard"), None).as_str(),
            "/"
        );
        assert_eq!(sanitize_callback_path(Some("dashboard"), None).as_str(), "/");
    }

    #[test]
    fn test_idempotence() {
        let inputs = [
            "",
            "/",
            "/dashboard?tab=2",
            "//evil.com/steal",
            "https://evil.com",
            "https://moltly.app/x y?q=a b#c d",
            "dashboard/../settings",
            "/\\evil.com",
            "/\t/evil.com",
            "https://moltly.app/.//evil.com",
            "?only=query",
            "#only-fragment",
            "::::",
        ];

        for input in inputs {
            let once = sanitize(Some(input));
            let twice = sanitize(Some(&once));
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_absolute_url() {
        let target = sanitize_callback_path(Some("/dashboard?tab=2"), Some(&origin()));
        assert_eq!(
            target.absolute_url(Some(&origin())),
            "https://moltly.app/dashboard?tab=2"
        );
        assert_eq!(target.absolute_url(None), "/dashboard?tab=2");
    }

    #[test]
    fn test_origin_parse() {
        assert!(AppOrigin::parse("https://moltly.app").is_ok());
        assert!(AppOrigin::parse("https://moltly.app/").is_ok());
        assert!(AppOrigin::parse("http://localhost:3000").is_ok());
        assert_eq!(
            AppOrigin::parse("ftp://moltly.app"),
            Err(CallbackError::UnsupportedScheme)
        );
        assert_eq!(
            AppOrigin::parse("https://moltly.app/login"),
            Err(CallbackError::NotAnOrigin)
        );
        assert!(matches!(
            AppOrigin::parse("not a url"),
            Err(CallbackError::InvalidOrigin(_))
        ));
    }

    #[test]
    fn test_origin_display() {
        assert_eq!(origin().to_string(), "https://moltly.app");
        assert_eq!(
            AppOrigin::parse("http://localhost:3000").unwrap().to_string(),
            "http://localhost:3000"
        );
        assert!(origin().is_secure());
    }
}
