use anyhow::Context as _;
use chrono::Duration;
use serde::Deserialize;

use carehub_core::config::Config;
use carehub_domain::phone::validate_country_code;

use crate::domain::types::{DEFAULT_CODE_TTL_MINUTES, MAX_CODE_TTL_MINUTES, MIN_CODE_TTL_MINUTES};

/// Auth service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port to listen on (default 3112). Env var: `AUTH_PORT`.
    #[serde(default = "default_auth_port")]
    pub auth_port: u16,
    /// HMAC secret for signing session tokens.
    pub jwt_secret: String,
    /// Cookie domain attribute (e.g. "carehub.example").
    pub cookie_domain: String,
    /// HMAC key for login code hashes. Env var: `LOGIN_CODE_SECRET`.
    pub login_code_secret: String,
    /// Login code lifetime in minutes, clamped to 1..=15 (default 5).
    #[serde(default = "default_ttl_minutes")]
    pub login_code_ttl_minutes: i64,
    /// Country calling code applied to national-format numbers (default "40").
    #[serde(default = "default_country_code")]
    pub default_country_code: String,
    /// Return the plaintext code in the issue response. Development only.
    #[serde(default)]
    pub login_code_expose_in_response: bool,
    /// Run the stale login code purge in-process every N seconds.
    #[serde(default)]
    pub login_code_purge_interval_secs: Option<u64>,
    /// SMS gateway endpoint. When unset, codes are written to the log instead.
    #[serde(default)]
    pub sms_gateway_url: Option<String>,
    #[serde(default)]
    pub sms_gateway_token: Option<String>,
    /// Sender id shown on the handset (default "CareHub").
    #[serde(default = "default_sms_sender_id")]
    pub sms_sender_id: String,
}

impl Config for AuthConfig {}

impl AuthConfig {
    /// Checks values that would otherwise only fail once a request uses them.
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_country_code(&self.default_country_code)
            .with_context(|| format!("DEFAULT_COUNTRY_CODE {:?}", self.default_country_code))?;
        Ok(())
    }
}

fn default_auth_port() -> u16 {
    3112
}

fn default_ttl_minutes() -> i64 {
    DEFAULT_CODE_TTL_MINUTES
}

fn default_country_code() -> String {
    "40".to_owned()
}

fn default_sms_sender_id() -> String {
    "CareHub".to_owned()
}

/// Parameters shared by the login code issuer and verifier.
#[derive(Debug, Clone)]
pub struct LoginCodeSettings {
    pub secret: String,
    pub ttl: Duration,
}

impl LoginCodeSettings {
    /// TTL outside 1..=15 minutes is clamped into range.
    pub fn new(secret: impl Into<String>, ttl_minutes: i64) -> Self {
        let clamped = ttl_minutes.clamp(MIN_CODE_TTL_MINUTES, MAX_CODE_TTL_MINUTES);
        if clamped != ttl_minutes {
            tracing::warn!(
                requested = ttl_minutes,
                applied = clamped,
                "login code ttl out of range, clamped"
            );
        }
        Self {
            secret: secret.into(),
            ttl: Duration::minutes(clamped),
        }
    }
}

impl From<&AuthConfig> for LoginCodeSettings {
    fn from(config: &AuthConfig) -> Self {
        Self::new(config.login_code_secret.clone(), config.login_code_ttl_minutes)
    }
}
