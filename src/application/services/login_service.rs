//! Sign-in orchestration between the form controller and the identity service.

use metrics::counter;
use std::sync::Arc;

use crate::application::login_form::{LoginFlowError, LoginFormController, UNAVAILABLE_MESSAGE};
use crate::domain::entities::Session;
use crate::domain::identity::{
    FederatedProvider, IdentityProvider, OAUTH_SIGNIN, SignInResult,
};

/// Drives sign-in attempts for [`LoginFormController`] instances.
///
/// Every failure path ends in a retryable form state. Nothing here is fatal
/// to the request: transport errors from the identity service are logged and
/// turned into a generic message on the form.
pub struct LoginService {
    identity: Arc<dyn IdentityProvider>,
}

impl LoginService {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }

    /// Federated providers to render on the sign-in page.
    pub fn federated_providers(&self) -> Vec<FederatedProvider> {
        self.identity.federated_providers()
    }

    /// Submits the form's credentials.
    ///
    /// On return the controller is either `Navigating` (and the issued
    /// session is returned) or in `Error` with the message to display.
    ///
    /// # Errors
    ///
    /// Returns [`LoginFlowError`] if the controller refuses the submission
    /// (already in flight or already navigating).
    pub async fn submit(
        &self,
        form: &mut LoginFormController,
    ) -> Result<Option<Session>, LoginFlowError> {
        let request = form.begin_submit()?;

        match self.identity.sign_in(request).await {
            Ok(result) => {
                counter!("sign_in_attempts_total", "provider" => "credentials", "outcome" => result.outcome())
                    .increment(1);

                match &result {
                    SignInResult::Authenticated(session) => {
                        tracing::info!(user_id = %session.user.id, "Sign-in succeeded");
                    }
                    SignInResult::Rejected { error } => {
                        tracing::info!(reason = %error, "Sign-in rejected");
                    }
                    SignInResult::Redirect(_) => {
                        tracing::warn!("Identity service redirected a password sign-in");
                    }
                }

                form.resolve(result)
            }
            Err(e) => {
                counter!("sign_in_attempts_total", "provider" => "credentials", "outcome" => "error")
                    .increment(1);
                tracing::error!(error = %e, "Identity service sign-in failed");

                form.abort(UNAVAILABLE_MESSAGE)?;
                Ok(None)
            }
        }
    }

    /// Starts a federated sign-in for `provider`.
    ///
    /// The form is left untouched; a `Rejected` result carries the message to
    /// show if the hand-off cannot start.
    pub async fn federated(&self, form: &LoginFormController, provider: &str) -> SignInResult {
        let request = form.federated_request(provider);

        let result = match self.identity.sign_in(request).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, provider, "Identity service federated sign-in failed");
                SignInResult::rejected(OAUTH_SIGNIN)
            }
        };

        counter!("sign_in_attempts_total", "provider" => "federated", "outcome" => result.outcome())
            .increment(1);
        tracing::info!(provider, outcome = result.outcome(), "Federated sign-in requested");

        result
    }
}
