pub mod db;
pub mod sms;
