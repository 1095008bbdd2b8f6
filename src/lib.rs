//! # Moltly Web
//!
//! Sign-in page and session-gated home page for Moltly, built with Axum.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Callback sanitization, sessions and the identity provider contract
//! - **Application Layer** ([`application`]) - Login form state machine and service orchestration
//! - **Infrastructure Layer** ([`infrastructure`]) - Configured identity provider
//! - **API Layer** ([`api`]) - Health endpoint and shared middleware
//! - **Web Layer** ([`web`]) - HTML pages, session cookie and session gate
//!
//! ## Features
//!
//! - Open-redirect-safe `callbackUrl` handling
//! - Email/password and federated sign-in
//! - Cookie sessions with a gate on protected pages
//! - Rate limiting and observability
//!
//! ## Quick Start
//!
//! ```bash
//! # Generate a signing secret, then an AUTH_USERS entry signed with it
//! cargo run --bin admin -- gen-secret
//! export AUTH_SIGNING_SECRET="<secret>"
//! cargo run --bin admin -- hash-password --email keeper@moltly.app
//! export AUTH_USERS="<entry>"
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;
pub mod web;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::login_form::{LoginFlowError, LoginFormController, LoginPhase};
    pub use crate::application::services::{LoginService, SessionService};
    pub use crate::domain::callback::{AppOrigin, CallbackTarget, sanitize_callback_path};
    pub use crate::domain::entities::{Credentials, Session, SessionUser};
    pub use crate::domain::identity::{IdentityProvider, SignInRequest, SignInResult};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
