use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};

use carehub_domain::id::LoginCodeId;
use carehub_domain::phone::PhoneNumber;

use crate::config::LoginCodeSettings;
use crate::domain::code_hash::{generate_code, hash_code};
use crate::domain::repository::{CodeSender, LoginCodeRepository};
use crate::domain::types::{
    LoginCode, RATE_LIMIT_MAX_CODES, RATE_LIMIT_WINDOW_SECS, RESEND_COOLDOWN_SECS,
};
use crate::error::AuthServiceError;

pub struct IssueLoginCodeInput {
    pub phone: PhoneNumber,
    pub requester_ip: Option<String>,
}

/// Plaintext code handed back to the caller. It is never persisted.
#[derive(Debug)]
pub struct IssuedLoginCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

pub struct IssueLoginCodeUseCase<L, S>
where
    L: LoginCodeRepository,
    S: CodeSender,
{
    pub login_codes: L,
    pub sender: S,
    pub settings: LoginCodeSettings,
}

impl<L, S> IssueLoginCodeUseCase<L, S>
where
    L: LoginCodeRepository,
    S: CodeSender,
{
    pub async fn execute(
        &self,
        input: IssueLoginCodeInput,
    ) -> Result<IssuedLoginCode, AuthServiceError> {
        let now = Utc::now();
        let phone = input.phone;

        // 1. Sliding-window cap → 429
        let window_start = now - Duration::seconds(RATE_LIMIT_WINDOW_SECS);
        let recent = self
            .login_codes
            .count_created_since(&phone, window_start)
            .await?;
        if recent >= RATE_LIMIT_MAX_CODES {
            debug!(phone = %phone.masked(), recent, "login code rate limit reached");
            return Err(AuthServiceError::RateLimited);
        }

        // 2. Resend cooldown → 429 with remaining seconds
        if let Some(latest) = self.login_codes.find_latest(&phone).await? {
            let elapsed_ms = (now - latest.created_at).num_milliseconds();
            let cooldown_ms = RESEND_COOLDOWN_SECS * 1000;
            if elapsed_ms < cooldown_ms {
                let remaining_ms = cooldown_ms - elapsed_ms.max(0);
                let retry_after_secs = ((remaining_ms + 999) / 1000).max(1);
                debug!(phone = %phone.masked(), retry_after_secs, "login code cooldown active");
                return Err(AuthServiceError::Cooldown { retry_after_secs });
            }
        }

        // 3. Mint + store hash only
        let code = generate_code();
        let expires_at = now + self.settings.ttl;
        let record = LoginCode {
            id: LoginCodeId::new(),
            code_hash: hash_code(&self.settings.secret, &phone, &code),
            phone,
            expires_at,
            consumed_at: None,
            attempts: 0,
            requester_ip: input.requester_ip,
            created_at: now,
        };
        self.login_codes.create(&record).await?;

        // 4. Dispatch
        self.sender.send(&record.phone, &code, expires_at).await?;

        info!(
            phone = %record.phone.masked(),
            login_code_id = %record.id,
            %expires_at,
            "login code issued"
        );
        Ok(IssuedLoginCode { code, expires_at })
    }
}
