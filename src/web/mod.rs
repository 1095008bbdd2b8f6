//! Web layer for the browser-facing sign-in flow.
//!
//! Uses Askama templates for server-side rendering.
//!
//! # Modules
//!
//! - [`handlers`] - Page handlers
//! - [`middleware`] - Session gate for protected pages
//! - [`routes`] - Route configuration
//! - [`session_cookie`] - Session cookie parsing and construction
//! - [`redirect`] - `303 See Other` responses

pub mod handlers;
pub mod middleware;
pub mod redirect;
pub mod routes;
pub mod session_cookie;
