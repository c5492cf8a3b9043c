#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use carehub_domain::id::LoginCodeId;
use carehub_domain::phone::PhoneNumber;

use crate::domain::types::{AuthUser, LoginCode};
use crate::error::AuthServiceError;

/// Staff accounts known to the auth service.
pub trait UserRepository: Send + Sync {
    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<AuthUser>, AuthServiceError>;
}

/// Store for phone login codes.
///
/// Counter updates must be single atomic statements; no other locking is relied on.
pub trait LoginCodeRepository: Send + Sync {
    /// Count codes created for `phone` at or after `since`, in any state.
    async fn count_created_since(
        &self,
        phone: &PhoneNumber,
        since: DateTime<Utc>,
    ) -> Result<u64, AuthServiceError>;

    /// Newest code for `phone` regardless of state.
    async fn find_latest(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<LoginCode>, AuthServiceError>;

    /// Newest unconsumed code for `phone` whose expiry is after `now`.
    async fn find_active(
        &self,
        phone: &PhoneNumber,
        now: DateTime<Utc>,
    ) -> Result<Option<LoginCode>, AuthServiceError>;

    async fn create(&self, code: &LoginCode) -> Result<(), AuthServiceError>;

    /// `attempts = attempts + 1`.
    async fn record_failed_attempt(&self, id: LoginCodeId) -> Result<(), AuthServiceError>;

    /// `consumed_at = now, attempts = attempts + 1`.
    async fn mark_consumed(
        &self,
        id: LoginCodeId,
        now: DateTime<Utc>,
    ) -> Result<(), AuthServiceError>;

    /// Delete every code that is expired, consumed, or has `attempts >= max_attempts`.
    /// Returns the number of rows removed.
    async fn delete_stale(
        &self,
        now: DateTime<Utc>,
        max_attempts: i32,
    ) -> Result<u64, AuthServiceError>;
}

/// Delivers a plaintext login code to its phone number.
pub trait CodeSender: Send + Sync {
    async fn send(
        &self,
        phone: &PhoneNumber,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError>;
}

impl<T: LoginCodeRepository> LoginCodeRepository for &T {
    async fn count_created_since(
        &self,
        phone: &PhoneNumber,
        since: DateTime<Utc>,
    ) -> Result<u64, AuthServiceError> {
        (**self).count_created_since(phone, since).await
    }

    async fn find_latest(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<LoginCode>, AuthServiceError> {
        (**self).find_latest(phone).await
    }

    async fn find_active(
        &self,
        phone: &PhoneNumber,
        now: DateTime<Utc>,
    ) -> Result<Option<LoginCode>, AuthServiceError> {
        (**self).find_active(phone, now).await
    }

    async fn create(&self, code: &LoginCode) -> Result<(), AuthServiceError> {
        (**self).create(code).await
    }

    async fn record_failed_attempt(&self, id: LoginCodeId) -> Result<(), AuthServiceError> {
        (**self).record_failed_attempt(id).await
    }

    async fn mark_consumed(
        &self,
        id: LoginCodeId,
        now: DateTime<Utc>,
    ) -> Result<(), AuthServiceError> {
        (**self).mark_consumed(id, now).await
    }

    async fn delete_stale(
        &self,
        now: DateTime<Utc>,
        max_attempts: i32,
    ) -> Result<u64, AuthServiceError> {
        (**self).delete_stale(now, max_attempts).await
    }
}
