//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Example
//!
//! ```bash
//! export PUBLIC_ORIGIN="https://moltly.app"
//! export AUTH_SIGNING_SECRET="change-me"
//! export AUTH_USERS="keeper@moltly.app:<digest>:Keeper"
//! export FEDERATED_PROVIDERS="discord|Discord|https://discord.com/oauth2/authorize"
//! ```
//!
//! Password digests are produced with `admin hash-password`.
//!
//! ## Required Variables
//!
//! - `AUTH_SIGNING_SECRET` - HMAC key for password digests
//!
//! ## Optional Variables
//!
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `PUBLIC_ORIGIN` - Origin the app is served from; derived from `Host` when unset
//! - `BEHIND_PROXY` - Trust `X-Forwarded-Proto` when deriving the origin (default: `false`)
//! - `AUTH_USERS` - Comma-separated `email:hexdigest[:Display Name]` entries
//! - `FEDERATED_PROVIDERS` - Comma-separated `id|Display Name|authorize_url` entries
//! - `SESSION_COOKIE_NAME` - Session cookie name (default: `moltly_session`)
//! - `SESSION_TTL_SECONDS` - Session lifetime (default: 2592000, 30 days)

use anyhow::{Context, Result};
use std::env;
use url::Url;

use crate::domain::callback::AppOrigin;

/// Upper bound for `SESSION_TTL_SECONDS` (one year).
pub const MAX_SESSION_TTL_SECONDS: u64 = 365 * 24 * 60 * 60;

/// Errors in a single `AUTH_USERS` or `FEDERATED_PROVIDERS` entry.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigEntryError {
    #[error("Account entry '{0}' must be 'email:hexdigest[:Display Name]'")]
    MalformedAccount(String),

    #[error("Account digest for '{0}' must be 64 hex characters")]
    InvalidDigest(String),

    #[error("Provider entry '{0}' must be 'id|Display Name|authorize_url'")]
    MalformedProvider(String),

    #[error("Provider '{0}' has an invalid authorize URL")]
    InvalidAuthorizeUrl(String),
}

/// An account accepted by the built-in identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountConfig {
    pub email: String,
    /// Lowercase hex HMAC-SHA256 of the password.
    pub secret_digest: String,
    pub name: Option<String>,
}

/// A federated provider offered on the sign-in page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedProviderConfig {
    pub id: String,
    pub name: String,
    pub authorize_url: Url,
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// Origin the application is served from. When `None`, the origin is
    /// derived per request from the `Host` header.
    pub public_origin: Option<AppOrigin>,
    /// When true, `X-Forwarded-Proto` picks the scheme of a derived origin.
    /// Enable only behind a trusted reverse proxy.
    pub behind_proxy: bool,
    /// HMAC key the account digests were produced with.
    pub auth_signing_secret: String,
    pub accounts: Vec<AccountConfig>,
    pub federated_providers: Vec<FederatedProviderConfig>,
    pub session_cookie_name: String,
    pub session_ttl_seconds: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or an entry list
    /// cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let listen_addr = env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let public_origin = match env::var("PUBLIC_ORIGIN") {
            Ok(raw) if !raw.trim().is_empty() => {
                Some(AppOrigin::parse(&raw).context("PUBLIC_ORIGIN is not a valid origin")?)
            }
            _ => None,
        };

        let behind_proxy = env::var("BEHIND_PROXY")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(false);

        let auth_signing_secret =
            env::var("AUTH_SIGNING_SECRET").context("AUTH_SIGNING_SECRET must be set")?;

        let accounts = parse_accounts(&env::var("AUTH_USERS").unwrap_or_default())
            .context("Failed to parse AUTH_USERS")?;

        let federated_providers =
            parse_federated_providers(&env::var("FEDERATED_PROVIDERS").unwrap_or_default())
                .context("Failed to parse FEDERATED_PROVIDERS")?;

        let session_cookie_name =
            env::var("SESSION_COOKIE_NAME").unwrap_or_else(|_| "moltly_session".to_string());

        let session_ttl_seconds = env::var("SESSION_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30 * 24 * 60 * 60);

        Ok(Self {
            listen_addr,
            log_level,
            log_format,
            public_origin,
            behind_proxy,
            auth_signing_secret,
            accounts,
            federated_providers,
            session_cookie_name,
            session_ttl_seconds,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - `auth_signing_secret` is empty
    /// - the session cookie name is not a valid cookie token
    /// - `session_ttl_seconds` is zero or above one year
    /// - a federated provider id is reserved or repeated
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if self.auth_signing_secret.is_empty() {
            anyhow::bail!("AUTH_SIGNING_SECRET must not be empty");
        }

        if !is_cookie_token(&self.session_cookie_name) {
            anyhow::bail!(
                "SESSION_COOKIE_NAME must be a non-empty cookie token, got '{}'",
                self.session_cookie_name
            );
        }

        if self.session_ttl_seconds == 0 || self.session_ttl_seconds > MAX_SESSION_TTL_SECONDS {
            anyhow::bail!(
                "SESSION_TTL_SECONDS must be between 1 and {}, got {}",
                MAX_SESSION_TTL_SECONDS,
                self.session_ttl_seconds
            );
        }

        for (idx, provider) in self.federated_providers.iter().enumerate() {
            if provider.id == "credentials" {
                anyhow::bail!("Federated provider id 'credentials' is reserved");
            }
            if self.federated_providers[..idx]
                .iter()
                .any(|p| p.id == provider.id)
            {
                anyhow::bail!("Federated provider '{}' is configured twice", provider.id);
            }
        }

        Ok(())
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);

        match &self.public_origin {
            Some(origin) => tracing::info!("  Public origin: {}", origin),
            None => tracing::info!("  Public origin: derived from Host header"),
        }

        tracing::info!("  Behind proxy: {}", self.behind_proxy);
        tracing::info!("  Accounts: {}", self.accounts.len());
        tracing::info!(
            "  Federated providers: {}",
            self.federated_providers
                .iter()
                .map(|p| p.id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        tracing::info!("  Session cookie: {}", self.session_cookie_name);
        tracing::info!("  Session TTL: {}s", self.session_ttl_seconds);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Cookie names are RFC 6265 tokens: visible ASCII minus separators.
fn is_cookie_token(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?={}".contains(&b))
}

/// Parses `AUTH_USERS`: comma-separated `email:hexdigest[:Display Name]`.
///
/// Blank entries are ignored.
pub fn parse_accounts(raw: &str) -> Result<Vec<AccountConfig>, ConfigEntryError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let mut parts = entry.splitn(3, ':');
            let (Some(email), Some(digest)) = (parts.next(), parts.next()) else {
                return Err(ConfigEntryError::MalformedAccount(entry.to_string()));
            };

            let email = email.trim();
            let digest = digest.trim().to_ascii_lowercase();

            if email.is_empty() || !email.contains('@') {
                return Err(ConfigEntryError::MalformedAccount(entry.to_string()));
            }

            if digest.len() != 64 || !digest.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(ConfigEntryError::InvalidDigest(email.to_string()));
            }

            let name = parts
                .next()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string);

            Ok(AccountConfig {
                email: email.to_string(),
                secret_digest: digest,
                name,
            })
        })
        .collect()
}

/// Parses `FEDERATED_PROVIDERS`: comma-separated `id|Display Name|authorize_url`.
///
/// Blank entries are ignored.
pub fn parse_federated_providers(
    raw: &str,
) -> Result<Vec<FederatedProviderConfig>, ConfigEntryError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let parts: Vec<&str> = entry.split('|').map(str::trim).collect();
            let [id, name, url] = parts.as_slice() else {
                return Err(ConfigEntryError::MalformedProvider(entry.to_string()));
            };

            if id.is_empty()
                || !id
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
            {
                return Err(ConfigEntryError::MalformedProvider(entry.to_string()));
            }

            let authorize_url = Url::parse(url)
                .ok()
                .filter(|u| matches!(u.scheme(), "http" | "https"))
                .ok_or_else(|| ConfigEntryError::InvalidAuthorizeUrl(id.to_string()))?;

            Ok(FederatedProviderConfig {
                id: id.to_ascii_lowercase(),
                name: (if name.is_empty() { id } else { name }).to_string(),
                authorize_url,
            })
        })
        .collect()
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
