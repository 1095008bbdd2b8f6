//! Application layer: the sign-in form state machine and the services that
//! drive it against the identity collaborator.
//!
//! # Available Components
//!
//! - [`login_form::LoginFormController`] - Per-form state machine
//! - [`services::LoginService`] - Password and federated sign-in
//! - [`services::SessionService`] - Session lookup and sign-out for gated pages

pub mod login_form;
pub mod services;
