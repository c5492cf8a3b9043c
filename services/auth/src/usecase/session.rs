use std::time::{SystemTime, UNIX_EPOCH};

use tracing::info;

use carehub_auth_types::cookie::SESSION_TOKEN_EXP;
use carehub_auth_types::token::encode_session_token;
use carehub_domain::phone::PhoneNumber;

use crate::config::LoginCodeSettings;
use crate::domain::repository::{LoginCodeRepository, UserRepository};
use crate::domain::types::AuthUser;
use crate::error::AuthServiceError;
use crate::usecase::verify::{VerifyLoginCodeInput, VerifyLoginCodeUseCase};

fn now_secs() -> Result<u64, AuthServiceError> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AuthServiceError::Internal(e.into()))?;
    Ok(elapsed.as_secs())
}

/// Sign a session token for `user`. Returns the token and its `exp`.
pub fn issue_session_token(
    user: &AuthUser,
    secret: &str,
) -> Result<(String, u64), AuthServiceError> {
    let exp = now_secs()? + SESSION_TOKEN_EXP;
    let token = encode_session_token(user.id.0, user.role, exp, secret)
        .map_err(|e| AuthServiceError::Internal(e.into()))?;
    Ok((token, exp))
}

pub struct LoginWithPhoneCodeInput {
    pub phone: PhoneNumber,
    pub code: String,
}

#[derive(Debug)]
pub struct LoginWithPhoneCodeOutput {
    pub user: AuthUser,
    pub session_token: String,
    pub session_exp: u64,
}

pub struct LoginWithPhoneCodeUseCase<U, L>
where
    U: UserRepository,
    L: LoginCodeRepository,
{
    pub users: U,
    pub login_codes: L,
    pub settings: LoginCodeSettings,
    pub jwt_secret: String,
}

impl<U, L> LoginWithPhoneCodeUseCase<U, L>
where
    U: UserRepository,
    L: LoginCodeRepository,
{
    pub async fn execute(
        &self,
        input: LoginWithPhoneCodeInput,
    ) -> Result<LoginWithPhoneCodeOutput, AuthServiceError> {
        let verifier = VerifyLoginCodeUseCase {
            login_codes: &self.login_codes,
            settings: self.settings.clone(),
        };
        let verified = verifier
            .execute(VerifyLoginCodeInput {
                phone: input.phone.clone(),
                code: input.code,
            })
            .await?;
        if !verified {
            return Err(AuthServiceError::InvalidLoginCode);
        }

        // Unknown numbers fail the same way as a wrong code.
        let user = self
            .users
            .find_by_phone(&input.phone)
            .await?
            .ok_or(AuthServiceError::InvalidLoginCode)?;

        let (session_token, session_exp) = issue_session_token(&user, &self.jwt_secret)?;
        info!(user_id = %user.id, "phone login succeeded");

        Ok(LoginWithPhoneCodeOutput {
            user,
            session_token,
            session_exp,
        })
    }
}
