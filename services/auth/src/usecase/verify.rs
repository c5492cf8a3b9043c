use chrono::Utc;
use tracing::debug;

use carehub_domain::phone::PhoneNumber;

use crate::config::LoginCodeSettings;
use crate::domain::code_hash::{hash_code, hashes_match, normalize_submitted_code};
use crate::domain::repository::LoginCodeRepository;
use crate::domain::types::MAX_VERIFY_ATTEMPTS;
use crate::error::AuthServiceError;

pub struct VerifyLoginCodeInput {
    pub phone: PhoneNumber,
    pub code: String,
}

/// Checks a submitted code against the newest active code for the phone.
///
/// `Ok(false)` covers no active code, attempts exhausted and hash mismatch alike;
/// callers cannot tell them apart. A malformed submission is `Err(InvalidCode)`.
pub struct VerifyLoginCodeUseCase<L: LoginCodeRepository> {
    pub login_codes: L,
    pub settings: LoginCodeSettings,
}

impl<L: LoginCodeRepository> VerifyLoginCodeUseCase<L> {
    pub async fn execute(&self, input: VerifyLoginCodeInput) -> Result<bool, AuthServiceError> {
        let code = normalize_submitted_code(&input.code)?;
        let now = Utc::now();
        let phone = input.phone;

        let Some(record) = self.login_codes.find_active(&phone, now).await? else {
            debug!(phone = %phone.masked(), "no active login code");
            return Ok(false);
        };

        if record.attempts >= MAX_VERIFY_ATTEMPTS {
            debug!(
                phone = %phone.masked(),
                login_code_id = %record.id,
                "login code attempts exhausted"
            );
            return Ok(false);
        }

        let expected = hash_code(&self.settings.secret, &phone, &code);
        if !hashes_match(&expected, &record.code_hash) {
            self.login_codes.record_failed_attempt(record.id).await?;
            debug!(
                phone = %phone.masked(),
                login_code_id = %record.id,
                attempts = record.attempts + 1,
                "login code mismatch"
            );
            return Ok(false);
        }

        self.login_codes.mark_consumed(record.id, now).await?;
        debug!(phone = %phone.masked(), login_code_id = %record.id, "login code consumed");
        Ok(true)
    }
}
