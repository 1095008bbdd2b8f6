//! Identity collaborator interface.
//!
//! Session issuance, credential checks and federated sign-in belong to an
//! external identity service. This crate only talks to it through
//! [`IdentityProvider`].
//!
//! # Implementations
//!
//! - [`crate::infrastructure::identity::StaticIdentityProvider`] - configuration-driven stand-in
//! - Test mocks available with `cfg(test)`

use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::domain::entities::{Credentials, Session};
use crate::error::AppError;

/// Error kind reported for a rejected email/password sign-in.
pub const CREDENTIALS_SIGNIN: &str = "CredentialsSignin";

/// Error kind reported when a federated hand-off cannot be started.
pub const OAUTH_SIGNIN: &str = "OAuthSignin";

/// Error kind reported when the collaborator answers in a way the flow cannot use.
pub const CONFIGURATION: &str = "Configuration";

/// Which sign-in mechanism a request targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProviderId {
    /// Email and password checked by the identity service.
    Credentials,
    /// Third-party provider, identified by its configured id (e.g. `discord`).
    Federated(String),
}

impl ProviderId {
    pub fn as_str(&self) -> &str {
        match self {
            ProviderId::Credentials => "credentials",
            ProviderId::Federated(id) => id,
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ProviderId {
    fn from(s: &str) -> Self {
        match s {
            "credentials" => ProviderId::Credentials,
            other => ProviderId::Federated(other.to_string()),
        }
    }
}

impl FromStr for ProviderId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

/// A federated provider offered on the sign-in page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedProvider {
    pub id: String,
    pub name: String,
}

/// One call to the identity service's sign-in capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInRequest {
    pub provider: ProviderId,
    /// Present for [`ProviderId::Credentials`] only.
    pub credentials: Option<Credentials>,
    /// When false the collaborator must not navigate on its own; the caller does.
    pub redirect: bool,
    /// Fully-qualified URL the collaborator sends the user back to.
    pub callback_url: String,
}

/// Outcome of a sign-in call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInResult {
    /// Credentials accepted and a session issued.
    Authenticated(Session),
    /// The user must continue at this URL (federated hand-off).
    Redirect(Url),
    /// Sign-in refused; `error` is shown to the user verbatim.
    Rejected { error: String },
}

impl SignInResult {
    pub fn rejected(error: impl Into<String>) -> Self {
        Self::Rejected {
            error: error.into(),
        }
    }

    /// Short label used in logs and metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            SignInResult::Authenticated(_) => "authenticated",
            SignInResult::Redirect(_) => "redirect",
            SignInResult::Rejected { .. } => "rejected",
        }
    }
}

/// Capabilities consumed from the identity service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Attempts a sign-in.
    ///
    /// A refused sign-in is `Ok(SignInResult::Rejected { .. })`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when the service cannot be reached.
    async fn sign_in(&self, request: SignInRequest) -> Result<SignInResult, AppError>;

    /// Looks up the session behind a token.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(session))` for a live session
    /// - `Ok(None)` for unknown or expired tokens
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when the service cannot be reached.
    async fn current_session(&self, token: &str) -> Result<Option<Session>, AppError>;

    /// Ends a session. Unknown tokens are not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] when the service cannot be reached.
    async fn sign_out(&self, token: &str) -> Result<(), AppError>;

    /// Federated providers to offer on the sign-in page.
    fn federated_providers(&self) -> Vec<FederatedProvider>;

    /// Returns true if the service is reachable.
    async fn health_check(&self) -> bool;
}
