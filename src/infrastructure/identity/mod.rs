//! Identity service implementations.
//!
//! - [`StaticIdentityProvider`] - accounts and federated providers from configuration

mod static_provider;

pub use static_provider::{StaticIdentityProvider, digest_secret};
