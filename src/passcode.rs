//! TOTP passcode generation
//!
//! Produces the current one-time passcode for a software TOTP factor from its
//! base32 shared secret (RFC 6238: HMAC-SHA1, 6 digits, 30 second step).

use crate::settings::MIN_TOTP_SECRET_LEN;
use thiserror::Error;
use totp_rs::{Algorithm, Secret, TOTP};

/// Digits in a generated passcode
pub const DIGITS: usize = 6;

/// Seconds each passcode stays valid
pub const STEP_SECONDS: u64 = 30;

#[derive(Debug, Error)]
pub enum PasscodeError {
    #[error("TOTP secret must be at least {MIN_TOTP_SECRET_LEN} characters, got {0}")]
    SecretTooShort(usize),

    #[error("TOTP secret is not valid base32: {0}")]
    InvalidSecret(String),

    #[error("System clock is before the Unix epoch: {0}")]
    Clock(#[from] std::time::SystemTimeError),
}

/// Passcode valid right now
///
/// # Errors
///
/// Returns an error if the secret is too short or not base32, or the system
/// clock is unusable.
pub fn generate_current(secret: &str) -> Result<String, PasscodeError> {
    Ok(totp_for(secret)?.generate_current()?)
}

/// Passcode for a given Unix timestamp
///
/// # Errors
///
/// Returns an error if the secret is too short or not base32.
pub fn generate_at(secret: &str, timestamp: u64) -> Result<String, PasscodeError> {
    Ok(totp_for(secret)?.generate(timestamp))
}

fn totp_for(secret: &str) -> Result<TOTP, PasscodeError> {
    // Authenticator apps display secrets in spaced, sometimes lower-case groups
    let normalized: String = secret
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();
    if normalized.len() < MIN_TOTP_SECRET_LEN {
        return Err(PasscodeError::SecretTooShort(normalized.len()));
    }

    let bytes = Secret::Encoded(normalized)
        .to_bytes()
        .map_err(|e| PasscodeError::InvalidSecret(format!("{e:?}")))?;

    // Provider secrets are often 80 bits, below the 128-bit floor `TOTP::new` enforces
    Ok(TOTP::new_unchecked(
        Algorithm::SHA1,
        DIGITS,
        1,
        STEP_SECONDS,
        bytes,
    ))
}
