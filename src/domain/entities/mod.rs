//! Core domain entities for the sign-in flow.
//!
//! Entities are plain data structures with small helpers; behavior lives in
//! [`crate::application`].
//!
//! # Entity Types
//!
//! - [`Credentials`] - Email/password pair held for one submission
//! - [`Session`] - An authenticated session issued by the identity collaborator
//! - [`SessionUser`] - The user a session belongs to

pub mod credentials;
pub mod session;

pub use credentials::Credentials;
pub use session::{Session, SessionUser};
