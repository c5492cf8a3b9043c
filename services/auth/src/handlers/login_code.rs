use std::net::SocketAddr;

use axum::{
    Json,
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use carehub_core::serde::to_rfc3339_ms;
use carehub_domain::phone::PhoneNumber;

use crate::domain::repository::{CodeSender, LoginCodeRepository};
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::issue::{IssueLoginCodeInput, IssueLoginCodeUseCase};

#[derive(Deserialize)]
pub struct CreateLoginCodeRequest {
    pub phone: String,
}

#[derive(Serialize)]
pub struct CreateLoginCodeResponse {
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// First `X-Forwarded-For` hop when present, else the socket peer.
pub fn requester_ip(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| peer.ip().to_string())
}

/// `POST /auth/phone/code`
pub async fn create_login_code(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(body): Json<CreateLoginCodeRequest>,
) -> Result<(StatusCode, Json<CreateLoginCodeResponse>), AuthServiceError> {
    let phone = PhoneNumber::parse(&body.phone, &state.default_country_code)?;

    let usecase = IssueLoginCodeUseCase {
        login_codes: state.login_code_repo(),
        sender: state.sms.clone(),
        settings: state.login_code_settings.clone(),
    };
    let input = IssueLoginCodeInput {
        phone,
        requester_ip: Some(requester_ip(&headers, peer)),
    };
    issue_login_code(&usecase, input, state.expose_code_in_response).await
}

/// Runs the issuer and shapes the `201 Created` body. The plaintext code is
/// included only when `expose_code` is set.
pub async fn issue_login_code<L, S>(
    usecase: &IssueLoginCodeUseCase<L, S>,
    input: IssueLoginCodeInput,
    expose_code: bool,
) -> Result<(StatusCode, Json<CreateLoginCodeResponse>), AuthServiceError>
where
    L: LoginCodeRepository,
    S: CodeSender,
{
    let issued = usecase.execute(input).await?;
    let response = CreateLoginCodeResponse {
        expires_at: issued.expires_at,
        code: expose_code.then_some(issued.code),
    };
    Ok((StatusCode::CREATED, Json(response)))
}
