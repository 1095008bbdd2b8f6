//! Services orchestrating the sign-in flow.

pub mod login_service;
pub mod session_service;

pub use login_service::LoginService;
pub use session_service::SessionService;
