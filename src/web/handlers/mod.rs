//! HTML page handlers for the sign-in flow.

mod home;
mod login;
mod logout;

pub use home::home_handler;
pub use login::{
    FederatedSubmission, LoginQuery, LoginSubmission, LoginTemplate, federated_login_handler,
    login_page_handler, login_submit_handler,
};
pub use logout::logout_handler;
