pub mod issue;
pub mod purge;
pub mod session;
pub mod verify;
