//! Sign-in form state machine.
//!
//! ```text
//!            begin_submit              Rejected / transport failure
//!   Idle ───────────────▶ Submitting ─────────────────────────────▶ Error
//!    │                       │  ▲                                     │
//!    │ reject_input          │  └──────────── begin_submit ───────────┘
//!    ▼                       │ Authenticated
//!  Error                     ▼
//!                        Navigating(target)
//! ```
//!
//! One controller serves one form instance. Field values survive every
//! transition so a failed attempt can be corrected and resubmitted.

use crate::domain::callback::{AppOrigin, CallbackTarget, sanitize_callback_path};
use crate::domain::entities::{Credentials, Session};
use crate::domain::identity::{CONFIGURATION, ProviderId, SignInRequest, SignInResult};

/// Message shown when the identity service could not be reached.
pub const UNAVAILABLE_MESSAGE: &str = "Unable to sign in right now. Please try again.";

/// Where the form currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginPhase {
    Idle,
    Submitting,
    Error(String),
    Navigating(CallbackTarget),
}

/// Transitions the controller refuses.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LoginFlowError {
    #[error("A sign-in attempt is already in flight")]
    SubmissionInFlight,

    #[error("Sign-in already succeeded")]
    AlreadyNavigating,

    #[error("No sign-in attempt is in flight")]
    NotSubmitting,
}

/// Transient state of one sign-in form.
#[derive(Debug, Clone)]
pub struct LoginFormController {
    callback_path: CallbackTarget,
    callback_url: String,
    email: String,
    password: String,
    phase: LoginPhase,
}

impl LoginFormController {
    /// Creates a controller for a form opened with `callbackUrl = raw_callback`.
    ///
    /// The raw value is sanitized here, before anything else sees it.
    pub fn new(raw_callback: Option<&str>, origin: Option<&AppOrigin>) -> Self {
        let callback_path = sanitize_callback_path(raw_callback, origin);
        let callback_url = callback_path.absolute_url(origin);

        Self {
            callback_path,
            callback_url,
            email: String::new(),
            password: String::new(),
            phase: LoginPhase::Idle,
        }
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn phase(&self) -> &LoginPhase {
        &self.phase
    }

    /// Sanitized same-origin path to land on after sign-in.
    pub fn callback_path(&self) -> &CallbackTarget {
        &self.callback_path
    }

    /// Fully-qualified callback URL handed to the identity service.
    pub fn callback_url(&self) -> &str {
        &self.callback_url
    }

    /// Message to render under the form, if any.
    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            LoginPhase::Error(message) => Some(message),
            _ => None,
        }
    }

    /// Target of the pending navigation after a successful sign-in.
    pub fn navigation_target(&self) -> Option<&CallbackTarget> {
        match &self.phase {
            LoginPhase::Navigating(target) => Some(target),
            _ => None,
        }
    }

    /// Whether the submit button accepts clicks.
    pub fn is_submit_enabled(&self) -> bool {
        matches!(self.phase, LoginPhase::Idle | LoginPhase::Error(_))
    }

    /// Starts a password sign-in: `Idle | Error` → `Submitting`.
    ///
    /// Clears any previous error and returns the request to send. The
    /// request asks the collaborator not to navigate; the controller does.
    ///
    /// # Errors
    ///
    /// - [`LoginFlowError::SubmissionInFlight`] while a submission is pending
    /// - [`LoginFlowError::AlreadyNavigating`] after a successful sign-in
    pub fn begin_submit(&mut self) -> Result<SignInRequest, LoginFlowError> {
        match self.phase {
            LoginPhase::Submitting => return Err(LoginFlowError::SubmissionInFlight),
            LoginPhase::Navigating(_) => return Err(LoginFlowError::AlreadyNavigating),
            LoginPhase::Idle | LoginPhase::Error(_) => {}
        }

        self.phase = LoginPhase::Submitting;

        Ok(SignInRequest {
            provider: ProviderId::Credentials,
            credentials: Some(Credentials::new(&self.email, &self.password)),
            redirect: false,
            callback_url: self.callback_url.clone(),
        })
    }

    /// Applies the collaborator's answer: `Submitting` → `Navigating | Error`.
    ///
    /// Returns the issued session on success.
    ///
    /// # Errors
    ///
    /// Returns [`LoginFlowError::NotSubmitting`] if no submission is pending.
    pub fn resolve(&mut self, result: SignInResult) -> Result<Option<Session>, LoginFlowError> {
        if self.phase != LoginPhase::Submitting {
            return Err(LoginFlowError::NotSubmitting);
        }

        match result {
            SignInResult::Authenticated(session) => {
                self.phase = LoginPhase::Navigating(self.callback_path.clone());
                Ok(Some(session))
            }
            SignInResult::Rejected { error } => {
                self.phase = LoginPhase::Error(error);
                Ok(None)
            }
            // Password sign-in is requested with `redirect: false`
            SignInResult::Redirect(_) => {
                self.phase = LoginPhase::Error(CONFIGURATION.to_string());
                Ok(None)
            }
        }
    }

    /// Fails the pending submission without an answer from the collaborator.
    ///
    /// # Errors
    ///
    /// Returns [`LoginFlowError::NotSubmitting`] if no submission is pending.
    pub fn abort(&mut self, message: impl Into<String>) -> Result<(), LoginFlowError> {
        if self.phase != LoginPhase::Submitting {
            return Err(LoginFlowError::NotSubmitting);
        }
        self.phase = LoginPhase::Error(message.into());
        Ok(())
    }

    /// Refuses locally invalid input before anything is sent.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Self::begin_submit`].
    pub fn reject_input(&mut self, message: impl Into<String>) -> Result<(), LoginFlowError> {
        match self.phase {
            LoginPhase::Submitting => Err(LoginFlowError::SubmissionInFlight),
            LoginPhase::Navigating(_) => Err(LoginFlowError::AlreadyNavigating),
            LoginPhase::Idle | LoginPhase::Error(_) => {
                self.phase = LoginPhase::Error(message.into());
                Ok(())
            }
        }
    }

    /// Builds a federated sign-in request.
    ///
    /// Federated providers send the user back by full URL, so the absolute
    /// callback URL is passed instead of the path. Form state is untouched.
    pub fn federated_request(&self, provider: &str) -> SignInRequest {
        SignInRequest {
            provider: ProviderId::from(provider),
            credentials: None,
            redirect: true,
            callback_url: self.callback_url.clone(),
        }
    }
}
