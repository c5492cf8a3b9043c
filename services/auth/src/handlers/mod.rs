pub mod health;
pub mod login_code;
pub mod session;
