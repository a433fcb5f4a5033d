//! Session authenticator
//!
//! Exchanges username/password, and a one-time passcode when the provider
//! mandates a second factor, for a short-lived session token.

use crate::authn::errors::AuthError;
use crate::authn::types::{
    select_totp_factor, AuthenticationResult, AuthnResponse, Credentials, Factor,
};
use crate::http::{HttpReply, HttpTransport};
use crate::utils::endpoints::authn_url;
use crate::utils::logging::LoggingHelper;
use serde_json::json;

/// Performs primary authentication and, when required, TOTP verification
pub struct SessionAuthenticator<'a, T: HttpTransport + ?Sized> {
    transport: &'a T,
}

impl<'a, T: HttpTransport + ?Sized> SessionAuthenticator<'a, T> {
    #[must_use]
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Authenticate and return the session token
    ///
    /// One network call when the provider answers `SUCCESS` or rejects the
    /// credentials, two when a TOTP factor has to be verified.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request cannot be sent (`Transport`)
    /// - The provider rejects the credentials (`AuthenticationRejected`)
    /// - MFA is required and `credentials.pass_code` is `None`
    ///   (`MfaRequiredButNoPasscode`)
    /// - No software TOTP factor is enrolled (`FactorNotEnrolled`)
    /// - The passcode is rejected (`MfaVerificationFailed`)
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<String, AuthError> {
        LoggingHelper::log_authn_start(&credentials.domain, &credentials.username);

        let body = json!({
            "username": credentials.username,
            "password": credentials.password,
        });
        let reply = self
            .transport
            .post_json(&authn_url(&credentials.domain), &body)
            .await?;

        match decode_reply(&reply)? {
            AuthenticationResult::Success { session_token } => {
                LoggingHelper::log_session_token_obtained(&session_token);
                Ok(session_token)
            }
            AuthenticationResult::MfaRequired {
                state_token,
                factors,
            } => {
                let factor_types: Vec<&str> =
                    factors.iter().map(|f| f.factor_type.as_str()).collect();
                LoggingHelper::log_mfa_challenge(&factor_types);

                let Some(pass_code) = credentials.pass_code.as_deref() else {
                    LoggingHelper::log_mfa_without_passcode();
                    return Err(AuthError::MfaRequiredButNoPasscode);
                };
                self.verify_totp(&state_token, &factors, pass_code).await
            }
            AuthenticationResult::Failure { status, message } => {
                Err(AuthError::AuthenticationRejected { status, message })
            }
        }
    }

    /// Answer an MFA challenge with a TOTP passcode
    async fn verify_totp(
        &self,
        state_token: &str,
        factors: &[Factor],
        pass_code: &str,
    ) -> Result<String, AuthError> {
        let factor = select_totp_factor(factors).ok_or_else(|| AuthError::FactorNotEnrolled {
            available: factors.iter().map(|f| f.factor_type.clone()).collect(),
        })?;
        LoggingHelper::log_factor_verification(&factor.factor_type, factor.provider.as_deref());

        let body = json!({
            "stateToken": state_token,
            "passCode": pass_code,
        });
        let reply = self
            .transport
            .post_json(&factor.verification_link, &body)
            .await?;

        match decode_reply(&reply)? {
            AuthenticationResult::Success { session_token } => {
                LoggingHelper::log_session_token_obtained(&session_token);
                Ok(session_token)
            }
            AuthenticationResult::MfaRequired { .. } => Err(AuthError::MfaVerificationFailed {
                status: "MFA_REQUIRED".to_string(),
                message: "provider still requires a second factor after verification"
                    .to_string(),
            }),
            AuthenticationResult::Failure { status, message } => {
                Err(AuthError::MfaVerificationFailed { status, message })
            }
        }
    }
}

/// Decode an authentication document regardless of HTTP status
///
/// Rejections arrive as 401/403 with a JSON error document, so the status code
/// alone does not decide the outcome.
fn decode_reply(reply: &HttpReply) -> Result<AuthenticationResult, AuthError> {
    let response: AuthnResponse =
        serde_json::from_str(&reply.body).map_err(|e| AuthError::InvalidResponse {
            http_status: reply.status,
            message: format!("{} ({e})", reply.status_text),
        })?;
    LoggingHelper::log_authn_status(response.status.as_deref(), reply.status);
    Ok(response.into_result())
}
