//! JSON endpoint handlers.

pub mod fallback;
pub mod health;

pub use fallback::fallback_handler;
pub use health::health_handler;
