//! Session types shared across CareHub services.
//!
//! Provides session JWT claims, session-token validation and the session cookie builders.

pub mod cookie;
pub mod token;
