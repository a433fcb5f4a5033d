//! Session authentication errors

use crate::http::TransportError;
use thiserror::Error;

/// Errors raised while exchanging credentials for a session token
///
/// Every variant is terminal; nothing is retried.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Bad credentials or any other provider-side denial
    #[error("Authentication rejected ({status}): {message}")]
    AuthenticationRejected { status: String, message: String },

    /// The provider demands a second factor and no passcode was supplied
    #[error("Multi-factor authentication is required but no passcode was supplied")]
    MfaRequiredButNoPasscode,

    /// No software TOTP factor is enrolled for the user
    #[error("No software TOTP factor is enrolled (available factors: {available:?})")]
    FactorNotEnrolled { available: Vec<String> },

    /// The passcode was rejected or has expired
    #[error("Factor verification failed ({status}): {message}")]
    MfaVerificationFailed { status: String, message: String },

    /// The response body was not an authentication document
    #[error("Invalid authentication response (HTTP {http_status}): {message}")]
    InvalidResponse { http_status: u16, message: String },
}
