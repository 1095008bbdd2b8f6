//! Domain layer: entities, callback sanitization and the identity interface.
//!
//! # Architecture
//!
//! - [`entities`] - Credentials and sessions
//! - [`callback`] - Application origin and same-origin callback targets
//! - [`identity`] - The identity collaborator trait and its request/result types
//!
//! # Design Principles
//!
//! - No dependencies on the web or infrastructure layers
//! - The identity service is reached only through [`identity::IdentityProvider`]
//! - Ambient state (origin, session) is passed in explicitly

pub mod callback;
pub mod entities;
pub mod identity;
