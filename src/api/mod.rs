//! Machine-facing HTTP surface.
//!
//! # Modules
//!
//! - [`dto`] - JSON response bodies
//! - [`handlers`] - health probe and unmatched-route handlers
//! - [`middleware`] - rate limiting and request tracing shared by all routes

pub mod dto;
pub mod handlers;
pub mod middleware;
