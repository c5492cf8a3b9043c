//! Phone number normalization.
//!
//! Every phone number that reaches a repository or a log line goes through
//! [`PhoneNumber::parse`] first, so two spellings of the same number always
//! map to the same stored key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Minimum number of digits after the `+` (country code included).
const MIN_DIGITS: usize = 8;

/// Maximum number of digits after the `+` (E.164 limit).
const MAX_DIGITS: usize = 15;

/// Errors returned by [`PhoneNumber::parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhoneError {
    #[error("phone number is empty")]
    Empty,
    #[error("phone number contains invalid character {0:?}")]
    InvalidCharacter(char),
    #[error("phone number has no country code")]
    MissingCountryCode,
    #[error("phone number has an invalid country code")]
    InvalidCountryCode,
    #[error("phone number must have between 8 and 15 digits, got {0}")]
    InvalidLength(usize),
}

/// Country calling codes are 1 to 3 digits with no leading zero.
pub fn validate_country_code(code: &str) -> Result<(), PhoneError> {
    let valid = (1..=3).contains(&code.len())
        && code.bytes().all(|b| b.is_ascii_digit())
        && !code.starts_with('0');
    if valid {
        Ok(())
    } else {
        Err(PhoneError::InvalidCountryCode)
    }
}

/// Canonical E.164 phone number (`+` followed by 8 to 15 digits).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalize user input into E.164.
    ///
    /// Accepted spellings, with spaces, `-`, `.`, `(` and `)` ignored:
    /// - `+40711111111` (international)
    /// - `0040711111111` (international dialing prefix)
    /// - `0711111111` (national trunk prefix, `default_country_code` is prepended)
    pub fn parse(raw: &str, default_country_code: &str) -> Result<Self, PhoneError> {
        let mut cleaned = String::with_capacity(raw.len());
        for c in raw.trim().chars() {
            match c {
                ' ' | '-' | '.' | '(' | ')' => {}
                '+' if cleaned.is_empty() => cleaned.push(c),
                '0'..='9' => cleaned.push(c),
                other => return Err(PhoneError::InvalidCharacter(other)),
            }
        }
        if cleaned.is_empty() {
            return Err(PhoneError::Empty);
        }

        let digits = if let Some(rest) = cleaned.strip_prefix('+') {
            rest.to_owned()
        } else if let Some(rest) = cleaned.strip_prefix("00") {
            rest.to_owned()
        } else if let Some(rest) = cleaned.strip_prefix('0') {
            validate_country_code(default_country_code)?;
            format!("{default_country_code}{rest}")
        } else {
            return Err(PhoneError::MissingCountryCode);
        };

        if digits.starts_with('0') {
            return Err(PhoneError::InvalidCountryCode);
        }
        if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits.len()) {
            return Err(PhoneError::InvalidLength(digits.len()));
        }

        Ok(Self(format!("+{digits}")))
    }

    /// Wrap a value that was already normalized (e.g. read back from the database).
    pub fn from_normalized(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Log-safe form: first three and last four characters (`+40****1111`).
    pub fn masked(&self) -> String {
        let s = self.0.as_str();
        if s.len() < 7 {
            return "****".to_owned();
        }
        match (s.get(..3), s.get(s.len() - 4..)) {
            (Some(head), Some(tail)) => format!("{head}****{tail}"),
            _ => "****".to_owned(),
        }
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
