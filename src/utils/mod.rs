//! Request helpers shared by the web and API layers.
//!
//! - [`request_origin`] - Application origin from configuration or the `Host` header

pub mod request_origin;
