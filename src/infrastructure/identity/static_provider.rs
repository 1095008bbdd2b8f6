//! Configuration-driven identity provider.

use async_trait::async_trait;
use base64::Engine as _;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::config::{AccountConfig, FederatedProviderConfig, MAX_SESSION_TTL_SECONDS};
use crate::domain::entities::{Credentials, Session, SessionUser};
use crate::domain::identity::{
    CREDENTIALS_SIGNIN, FederatedProvider, IdentityProvider, OAUTH_SIGNIN, ProviderId,
    SignInRequest, SignInResult,
};
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 keyed by the signing secret, fed with `password`.
///
/// # Panics
///
/// Never: HMAC takes keys of any length (long keys are hashed, short ones
/// padded), so `new_from_slice` cannot fail for `Hmac<Sha256>`.
fn password_mac(signing_secret: &str, password: &str) -> HmacSha256 {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(password.as_bytes());
    mac
}

/// Computes the stored digest of a password.
///
/// HMAC-SHA256 keyed by the signing secret, lowercase hex. The admin CLI uses
/// the same function to produce `AUTH_USERS` entries.
pub fn digest_secret(signing_secret: &str, password: &str) -> String {
    hex::encode(password_mac(signing_secret, password).finalize().into_bytes())
}

/// Generates an opaque 256-bit session token, base64url without padding.
fn generate_session_token() -> String {
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

struct Account {
    id: String,
    email: String,
    name: Option<String>,
    digest: Vec<u8>,
}

/// In-process stand-in for the external identity service.
///
/// Accounts and federated providers come from configuration; sessions live
/// in memory and vanish on restart. Password digests are compared in
/// constant time.
pub struct StaticIdentityProvider {
    signing_secret: String,
    accounts: HashMap<String, Account>,
    federated: Vec<FederatedProviderConfig>,
    session_ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl StaticIdentityProvider {
    /// Creates a provider.
    ///
    /// # Arguments
    ///
    /// - `signing_secret` - HMAC key the account digests were produced with
    /// - `accounts` - accepted accounts; emails are matched case-insensitively
    /// - `federated` - providers offered for federated sign-in
    /// - `session_ttl_seconds` - lifetime of issued sessions
    pub fn new(
        signing_secret: String,
        accounts: Vec<AccountConfig>,
        federated: Vec<FederatedProviderConfig>,
        session_ttl_seconds: u64,
    ) -> Self {
        let accounts = accounts
            .into_iter()
            .enumerate()
            .filter_map(|(idx, account)| {
                let digest = match hex::decode(&account.secret_digest) {
                    Ok(digest) => digest,
                    Err(e) => {
                        tracing::warn!(
                            email = %account.email,
                            error = %e,
                            "Skipping account with malformed digest"
                        );
                        return None;
                    }
                };
                let email = account.email.trim().to_ascii_lowercase();
                Some((
                    email.clone(),
                    Account {
                        id: format!("user-{}", idx + 1),
                        email,
                        name: account.name,
                        digest,
                    },
                ))
            })
            .collect();

        let session_ttl =
            Duration::seconds(session_ttl_seconds.min(MAX_SESSION_TTL_SECONDS) as i64);

        Self {
            signing_secret,
            accounts,
            federated,
            session_ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn verify(&self, account: &Account, password: &str) -> bool {
        password_mac(&self.signing_secret, password)
            .verify_slice(&account.digest)
            .is_ok()
    }

    async fn sign_in_with_credentials(&self, credentials: Option<&Credentials>) -> SignInResult {
        let Some(credentials) = credentials else {
            return SignInResult::rejected(CREDENTIALS_SIGNIN);
        };

        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return SignInResult::rejected(CREDENTIALS_SIGNIN);
        }

        let Some(account) = self.accounts.get(&credentials.normalized_email()) else {
            tracing::debug!("Sign-in for unknown account");
            return SignInResult::rejected(CREDENTIALS_SIGNIN);
        };

        if !self.verify(account, &credentials.password) {
            tracing::debug!(user_id = %account.id, "Password mismatch");
            return SignInResult::rejected(CREDENTIALS_SIGNIN);
        }

        let session = Session {
            token: generate_session_token(),
            user: SessionUser {
                id: account.id.clone(),
                email: account.email.clone(),
                name: account.name.clone(),
            },
            expires_at: Utc::now() + self.session_ttl,
        };

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| !s.is_expired());
        sessions.insert(session.token.clone(), session.clone());

        SignInResult::Authenticated(session)
    }

    fn sign_in_federated(&self, provider_id: &str, callback_url: &str) -> SignInResult {
        let Some(provider) = self.federated.iter().find(|p| p.id == provider_id) else {
            tracing::warn!(provider = provider_id, "Unknown federated provider");
            return SignInResult::rejected(OAUTH_SIGNIN);
        };

        let mut url = provider.authorize_url.clone();
        url.query_pairs_mut().append_pair("callbackUrl", callback_url);

        SignInResult::Redirect(url)
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn sign_in(&self, request: SignInRequest) -> Result<SignInResult, AppError> {
        let result = match &request.provider {
            ProviderId::Credentials => {
                self.sign_in_with_credentials(request.credentials.as_ref()).await
            }
            ProviderId::Federated(id) => self.sign_in_federated(id, &request.callback_url),
        };

        Ok(result)
    }

    async fn current_session(&self, token: &str) -> Result<Option<Session>, AppError> {
        let found = self.sessions.read().await.get(token).cloned();

        match found {
            Some(session) if session.is_expired() => {
                self.sessions.write().await.remove(token);
                Ok(None)
            }
            other => Ok(other),
        }
    }

    async fn sign_out(&self, token: &str) -> Result<(), AppError> {
        self.sessions.write().await.remove(token);
        Ok(())
    }

    fn federated_providers(&self) -> Vec<FederatedProvider> {
        self.federated
            .iter()
            .map(|p| FederatedProvider {
                id: p.id.clone(),
                name: p.name.clone(),
            })
            .collect()
    }

    async fn health_check(&self) -> bool {
        true
    }
}
