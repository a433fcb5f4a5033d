// Centralized logging utilities for the credential-to-token flow.
// Passwords, passcodes, session tokens and issued tokens are never logged;
// only their presence or length.
use log::{debug, info, warn};

pub struct LoggingHelper;

impl LoggingHelper {
    /// Log the start of primary (password) authentication
    pub fn log_authn_start(domain: &str, username: &str) {
        info!("🔐 Authenticating {username} against {domain}");
    }

    /// Log the status the provider answered a primary authentication with
    pub fn log_authn_status(status: Option<&str>, http_status: u16) {
        debug!(
            "Authentication response: status={}, http_status={http_status}",
            status.unwrap_or("<none>")
        );
    }

    /// Log that the provider demands a second factor
    pub fn log_mfa_challenge(factor_types: &[&str]) {
        info!("🔑 Multi-factor authentication required; enrolled factors: {factor_types:?}");
    }

    /// Log that MFA is required but the caller supplied nothing to answer with
    pub fn log_mfa_without_passcode() {
        warn!("Multi-factor authentication required but no passcode was supplied");
    }

    /// Log the factor verification request
    pub fn log_factor_verification(factor_type: &str, provider: Option<&str>) {
        info!(
            "🔄 Verifying {factor_type} factor ({})",
            provider.unwrap_or("unknown provider")
        );
    }

    /// Log a successfully obtained session token
    pub fn log_session_token_obtained(session_token: &str) {
        info!(
            "✅ Session token obtained ({} characters)",
            session_token.len()
        );
    }

    /// Log token exchange start
    pub fn log_token_exchange_start(domain: &str, response_type: &str, scopes: &str) {
        info!("🔄 Exchanging session token for '{response_type}' with {domain} (scopes: {scopes})");
    }

    /// Log the redirect the authorize endpoint answered with
    pub fn log_authorize_redirect(status: u16, location_present: bool) {
        debug!("Authorize response: status={status}, location={location_present}");
    }

    /// Log token exchange summary
    pub fn log_token_exchange_summary(
        id_token: Option<&String>,
        access_token: Option<&String>,
        token_type: Option<&String>,
        expires_in: Option<u64>,
    ) {
        info!(
            "🔍 Token exchange summary: id_token={}, access_token={}, token_type={:?}, expires_in={:?}",
            id_token.map_or("missing", |_| "present"),
            access_token.map_or("missing", |_| "present"),
            token_type,
            expires_in
        );
    }
}
