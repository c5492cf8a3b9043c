//! Login code generation, keyed hashing and comparison.

use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use rand::RngExt;
use sha2::Sha256;

use carehub_domain::phone::PhoneNumber;

use crate::domain::types::LOGIN_CODE_LEN;
use crate::error::AuthServiceError;

type HmacSha256 = Hmac<Sha256>;

/// Uniformly random numeric code of [`LOGIN_CODE_LEN`] digits; leading zeros kept.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    let upper = 10u32.pow(LOGIN_CODE_LEN as u32);
    let value = rng.random_range(0..upper);
    format!("{value:0width$}", width = LOGIN_CODE_LEN)
}

/// Lowercase hex `HMAC-SHA256(secret, "<phone>:<code>")`.
pub fn hash_code(secret: &str, phone: &PhoneNumber, code: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(phone.as_str().as_bytes());
    mac.update(b":");
    mac.update(code.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Length check first, then timing-safe equality.
pub fn hashes_match(expected: &str, stored: &str) -> bool {
    if expected.len() != stored.len() {
        return false;
    }
    constant_time_eq(expected.as_bytes(), stored.as_bytes())
}

/// Strip all whitespace; the rest must be exactly [`LOGIN_CODE_LEN`] ASCII digits.
pub fn normalize_submitted_code(raw: &str) -> Result<String, AuthServiceError> {
    let code: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if code.len() != LOGIN_CODE_LEN || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AuthServiceError::InvalidCode);
    }
    Ok(code)
}
