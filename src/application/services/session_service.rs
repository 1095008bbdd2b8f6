//! Session lookup for gated pages.

use std::sync::Arc;

use crate::domain::entities::Session;
use crate::domain::identity::IdentityProvider;
use crate::error::AppError;

/// Resolves and ends sessions through the identity service.
pub struct SessionService {
    identity: Arc<dyn IdentityProvider>,
}

impl SessionService {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }

    /// Returns the live session behind `token`, if any.
    ///
    /// A missing token short-circuits without calling the identity service.
    ///
    /// # Errors
    ///
    /// Propagates [`AppError`] from the identity service.
    pub async fn current_session(&self, token: Option<&str>) -> Result<Option<Session>, AppError> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };

        let session = self.identity.current_session(token).await?;

        // Collaborators are trusted to expire sessions, but a stale one is never served
        Ok(session.filter(|s| !s.is_expired()))
    }

    /// Ends the session behind `token`.
    ///
    /// # Errors
    ///
    /// Propagates [`AppError`] from the identity service.
    pub async fn sign_out(&self, token: Option<&str>) -> Result<(), AppError> {
        match token.filter(|t| !t.is_empty()) {
            Some(token) => {
                self.identity.sign_out(token).await?;
                tracing::info!("Session ended");
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Returns true if the identity service is reachable.
    pub async fn health_check(&self) -> bool {
        self.identity.health_check().await
    }
}
