use chrono::{DateTime, Utc};

use carehub_domain::id::{LoginCodeId, UserId};
use carehub_domain::phone::PhoneNumber;

/// Staff account that can sign in by phone.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: UserId,
    pub phone: PhoneNumber,
    pub role: u8,
}

/// Pending phone authentication challenge.
///
/// Holds the keyed hash of the code, never the plaintext.
#[derive(Debug, Clone)]
pub struct LoginCode {
    pub id: LoginCodeId,
    pub phone: PhoneNumber,
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
    pub consumed_at: Option<DateTime<Utc>>,
    pub attempts: i32,
    pub requester_ip: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle of a single [`LoginCode`]. Every state except `Pending` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginCodeState {
    Pending,
    Consumed,
    Exhausted,
    Expired,
}

impl LoginCode {
    pub fn state(&self, now: DateTime<Utc>) -> LoginCodeState {
        if self.consumed_at.is_some() {
            LoginCodeState::Consumed
        } else if self.attempts >= MAX_VERIFY_ATTEMPTS {
            LoginCodeState::Exhausted
        } else if self.expires_at <= now {
            LoginCodeState::Expired
        } else {
            LoginCodeState::Pending
        }
    }

    /// Unconsumed and unexpired. Candidates for verification are selected with
    /// this; the attempt limit is checked separately afterwards.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.consumed_at.is_none() && self.expires_at > now
    }

    /// Eligible for deletion by the purge job.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.state(now) != LoginCodeState::Pending
    }
}

/// Login code length in digits.
pub const LOGIN_CODE_LEN: usize = 6;

/// Verification attempts allowed per code (successful attempt included).
pub const MAX_VERIFY_ATTEMPTS: i32 = 5;

/// Trailing window for the per-phone issuance cap.
pub const RATE_LIMIT_WINDOW_SECS: i64 = 15 * 60;

/// Codes that may be issued per phone within [`RATE_LIMIT_WINDOW_SECS`].
pub const RATE_LIMIT_MAX_CODES: u64 = 5;

/// Minimum delay between two codes for the same phone.
pub const RESEND_COOLDOWN_SECS: i64 = 60;

pub const DEFAULT_CODE_TTL_MINUTES: i64 = 5;
pub const MIN_CODE_TTL_MINUTES: i64 = 1;
pub const MAX_CODE_TTL_MINUTES: i64 = 15;
