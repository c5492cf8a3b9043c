use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

use carehub_domain::phone::PhoneError;

use crate::domain::types::RATE_LIMIT_WINDOW_SECS;

/// Auth service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("invalid phone number: {0}")]
    InvalidPhone(#[from] PhoneError),
    #[error("login code must be exactly 6 digits")]
    InvalidCode,
    #[error("too many login codes requested")]
    RateLimited,
    #[error("please wait {retry_after_secs} seconds before requesting a new code")]
    Cooldown { retry_after_secs: i64 },
    #[error("invalid login code")]
    InvalidLoginCode,
    #[error("session expired")]
    InvalidSession,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidPhone(_) => "INVALID_PHONE",
            Self::InvalidCode => "INVALID_CODE",
            Self::RateLimited => "RATE_LIMITED",
            Self::Cooldown { .. } => "COOLDOWN",
            Self::InvalidLoginCode => "INVALID_LOGIN_CODE",
            Self::InvalidSession => "INVALID_SESSION",
            Self::Internal(_) => "INTERNAL",
        }
    }

    fn retry_after_secs(&self) -> Option<i64> {
        match self {
            Self::RateLimited => Some(RATE_LIMIT_WINDOW_SECS),
            Self::Cooldown { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidPhone(_) | Self::InvalidCode => StatusCode::BAD_REQUEST,
            Self::RateLimited | Self::Cooldown { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::InvalidLoginCode | Self::InvalidSession => StatusCode::UNAUTHORIZED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // TraceLayer already records every request; only the anyhow chain of a 500 is logged here.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let retry_after = self.retry_after_secs();
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::Cooldown { retry_after_secs } = &self {
            body["retry_after_secs"] = (*retry_after_secs).into();
        }
        let mut response = (status, axum::Json(body)).into_response();
        if let Some(secs) = retry_after {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}
