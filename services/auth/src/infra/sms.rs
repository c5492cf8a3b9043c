use std::time::Duration;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use carehub_domain::phone::PhoneNumber;

use crate::config::AuthConfig;
use crate::domain::repository::CodeSender;
use crate::error::AuthServiceError;

const GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Text delivered to the handset.
pub fn login_code_message(code: &str, expires_at: DateTime<Utc>) -> String {
    format!(
        "{code} is your CareHub login code. It expires at {} UTC.",
        expires_at.format("%H:%M")
    )
}

// ── HTTP gateway ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GatewayMessage<'a> {
    to: &'a str,
    from: &'a str,
    text: String,
}

/// Posts `{ to, from, text }` JSON to an SMS gateway with an optional bearer token.
#[derive(Clone)]
pub struct HttpSmsSender {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
    sender_id: String,
}

impl HttpSmsSender {
    pub fn new(
        url: String,
        token: Option<String>,
        sender_id: String,
    ) -> Result<Self, AuthServiceError> {
        let client = reqwest::Client::builder()
            .timeout(GATEWAY_TIMEOUT)
            .build()
            .context("build SMS gateway client")?;
        Ok(Self {
            client,
            url,
            token,
            sender_id,
        })
    }
}

impl CodeSender for HttpSmsSender {
    async fn send(
        &self,
        phone: &PhoneNumber,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError> {
        let message = GatewayMessage {
            to: phone.as_str(),
            from: &self.sender_id,
            text: login_code_message(code, expires_at),
        };
        let mut request = self.client.post(&self.url).json(&message);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
            .send()
            .await
            .context("send SMS gateway request")?
            .error_for_status()
            .context("SMS gateway rejected login code")?;
        info!(phone = %phone.masked(), "login code sent via SMS gateway");
        Ok(())
    }
}

// ── Log fallback ─────────────────────────────────────────────────────────────

/// Writes the code to the service log. Used when no gateway is configured.
#[derive(Clone, Default)]
pub struct LogCodeSender;

impl CodeSender for LogCodeSender {
    async fn send(
        &self,
        phone: &PhoneNumber,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError> {
        warn!(
            phone = %phone.masked(),
            code,
            %expires_at,
            "SMS gateway not configured, login code written to log"
        );
        Ok(())
    }
}

// ── Runtime selection ────────────────────────────────────────────────────────

#[derive(Clone)]
pub enum SmsDispatcher {
    Gateway(HttpSmsSender),
    Log(LogCodeSender),
}

impl SmsDispatcher {
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthServiceError> {
        match &config.sms_gateway_url {
            Some(url) => Ok(Self::Gateway(HttpSmsSender::new(
                url.clone(),
                config.sms_gateway_token.clone(),
                config.sms_sender_id.clone(),
            )?)),
            None => Ok(Self::Log(LogCodeSender)),
        }
    }
}

impl CodeSender for SmsDispatcher {
    async fn send(
        &self,
        phone: &PhoneNumber,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError> {
        match self {
            Self::Gateway(sender) => sender.send(phone, code, expires_at).await,
            Self::Log(sender) => sender.send(phone, code, expires_at).await,
        }
    }
}
