use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use carehub_auth_types::{
    cookie::{CAREHUB_SESSION, clear_session_cookie, set_session_cookie},
    token::validate_session_token,
};
use carehub_domain::phone::PhoneNumber;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::session::{LoginWithPhoneCodeInput, LoginWithPhoneCodeUseCase};

#[derive(Serialize)]
pub struct SessionResponse {
    pub user_id: uuid::Uuid,
    pub user_role: u8,
    pub access_token_exp: u64,
}

// ── POST /auth/phone/session ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    pub phone: String,
    pub code: String,
}

pub async fn create_session(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let phone = PhoneNumber::parse(&body.phone, &state.default_country_code)?;

    let usecase = LoginWithPhoneCodeUseCase {
        users: state.user_repo(),
        login_codes: state.login_code_repo(),
        settings: state.login_code_settings.clone(),
        jwt_secret: state.jwt_secret.clone(),
    };
    let output = usecase
        .execute(LoginWithPhoneCodeInput {
            phone,
            code: body.code,
        })
        .await?;

    let jar = set_session_cookie(jar, output.session_token, state.cookie_domain.clone());
    let body = SessionResponse {
        user_id: output.user.id.0,
        user_role: output.user.role,
        access_token_exp: output.session_exp,
    };
    Ok((StatusCode::CREATED, jar, Json(body)))
}

// ── GET /auth/session ────────────────────────────────────────────────────────

pub async fn check_session(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<SessionResponse>, AuthServiceError> {
    let token = jar
        .get(CAREHUB_SESSION)
        .map(|c| c.value().to_owned())
        .ok_or(AuthServiceError::InvalidSession)?;

    let info = validate_session_token(&token, &state.jwt_secret)
        .map_err(|_| AuthServiceError::InvalidSession)?;

    Ok(Json(SessionResponse {
        user_id: info.user_id,
        user_role: info.user_role,
        access_token_exp: info.session_exp,
    }))
}

// ── DELETE /auth/session ─────────────────────────────────────────────────────

pub async fn delete_session(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = clear_session_cookie(jar, state.cookie_domain.clone());
    (StatusCode::NO_CONTENT, jar)
}
