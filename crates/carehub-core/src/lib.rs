//! Service plumbing shared by CareHub HTTP services.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
