use std::time::Duration;

use chrono::Utc;
use tracing::{error, info};

use crate::domain::repository::LoginCodeRepository;
use crate::domain::types::MAX_VERIFY_ATTEMPTS;
use crate::error::AuthServiceError;

/// Removes expired, consumed and attempt-exhausted login codes for every phone.
///
/// Run by the `login-code-janitor` binary or the auth service's optional
/// background task; issuance never triggers it.
pub struct PurgeLoginCodesUseCase<L: LoginCodeRepository> {
    pub login_codes: L,
}

impl<L: LoginCodeRepository> PurgeLoginCodesUseCase<L> {
    pub async fn execute(&self) -> Result<u64, AuthServiceError> {
        let deleted = self
            .login_codes
            .delete_stale(Utc::now(), MAX_VERIFY_ATTEMPTS)
            .await?;
        info!(deleted, "stale login codes purged");
        Ok(deleted)
    }

    /// Purge every `period`, forever. Failures are logged and the loop continues.
    pub async fn run_periodic(&self, period: Duration) {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = self.execute().await {
                error!(error = ?e, "login code purge failed");
            }
        }
    }
}
