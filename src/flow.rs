//! Credential-to-token flow
//!
//! Sequences the session authenticator and the token exchanger. The session
//! token is single-use and short-lived, so the exchange starts as soon as it is
//! available and nothing is retried.

use crate::authn::{AuthError, Credentials, SessionAuthenticator};
use crate::http::HttpTransport;
use crate::passcode::{self, PasscodeError};
use crate::settings::{AutotokenSettings, SettingsError};
use crate::token::{
    ResponseType, Scopes, TokenError, TokenExchanger, TokenRequestParams, TokenResult,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Passcode generation failed: {0}")]
    Passcode(#[from] PasscodeError),

    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    #[error("Token exchange failed: {0}")]
    Token(#[from] TokenError),
}

/// OAuth client parameters, independent of who is logging in
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub client_id: String,
    pub redirect_uri: String,
    pub scopes: Scopes,
    pub response_type: ResponseType,
    pub authorization_server: String,
}

impl ClientConfig {
    /// Client parameters from validated settings
    ///
    /// # Errors
    ///
    /// Returns an error if the configured response type is unknown.
    pub fn from_settings(settings: &AutotokenSettings) -> Result<Self, SettingsError> {
        Ok(Self {
            client_id: settings.provider.client_id.clone(),
            redirect_uri: settings.provider.redirect_uri.clone(),
            scopes: settings.scopes(),
            response_type: settings.response_type()?,
            authorization_server: settings.provider.authorization_server.clone(),
        })
    }

    fn token_params(&self, domain: &str, session_token: String) -> TokenRequestParams {
        TokenRequestParams {
            domain: domain.to_string(),
            session_token,
            client_id: self.client_id.clone(),
            redirect_uri: self.redirect_uri.clone(),
            scopes: self.scopes.clone(),
            response_type: self.response_type,
            authorization_server: self.authorization_server.clone(),
        }
    }
}

/// Authenticates and exchanges the session token for tokens
pub struct TokenFlow<'a, T: HttpTransport + ?Sized> {
    transport: &'a T,
    client: ClientConfig,
}

impl<'a, T: HttpTransport + ?Sized> TokenFlow<'a, T> {
    #[must_use]
    pub fn new(transport: &'a T, client: ClientConfig) -> Self {
        Self { transport, client }
    }

    /// Run both steps for `credentials`
    ///
    /// # Errors
    ///
    /// Returns the first authentication or exchange error.
    pub async fn run(&self, credentials: &Credentials) -> Result<TokenResult, FlowError> {
        let session_token = SessionAuthenticator::new(self.transport)
            .authenticate(credentials)
            .await?;

        let params = self.client.token_params(&credentials.domain, session_token);
        let tokens = TokenExchanger::new(self.transport)
            .exchange_for_tokens(&params)
            .await?;

        Ok(tokens)
    }
}

/// Fetch tokens for the user configured in `settings`
///
/// A passcode is generated from `credentials.totp_secret` when one is set.
///
/// # Errors
///
/// Returns an error if:
/// - The settings are incomplete or malformed
/// - The TOTP secret cannot produce a passcode
/// - Authentication or token exchange fails
pub async fn fetch_tokens<T: HttpTransport + ?Sized>(
    settings: &AutotokenSettings,
    transport: &T,
) -> Result<TokenResult, FlowError> {
    settings.validate()?;

    let pass_code = settings
        .credentials
        .totp_secret
        .as_deref()
        .map(passcode::generate_current)
        .transpose()?;
    let credentials = settings.credentials(pass_code);

    TokenFlow::new(transport, ClientConfig::from_settings(settings)?)
        .run(&credentials)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpReply;
    use crate::testing::fixtures::TestFixtures;
    use crate::testing::mock::MockTransport;

    #[tokio::test]
    async fn test_flow_without_mfa() {
        let transport = MockTransport::new()
            .with_reply(TestFixtures::authn_success("20111abc"))
            .with_reply(HttpReply::redirect(
                "https://app.test/callback#access_token=AAA&id_token=BBB",
            ));

        let tokens = fetch_tokens(&TestFixtures::settings(), &transport)
            .await
            .unwrap();

        assert_eq!(tokens.access_token.as_deref(), Some("AAA"));
        assert_eq!(tokens.id_token.as_deref(), Some("BBB"));

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].method, "POST");
        assert_eq!(calls[1].method, "GET");
        assert!(calls[1].url.contains("sessionToken=20111abc"));
    }

    #[tokio::test]
    async fn test_flow_with_generated_passcode() {
        let mut settings = TestFixtures::settings();
        settings.credentials.totp_secret = Some(TestFixtures::TOTP_SECRET.to_string());
        let transport = MockTransport::new()
            .with_reply(TestFixtures::authn_mfa_required(&[
                TestFixtures::totp_factor_entry(),
            ]))
            .with_reply(TestFixtures::authn_success("20111mfa"))
            .with_reply(HttpReply::redirect("https://app.test/callback#id_token=BBB"));

        let tokens = fetch_tokens(&settings, &transport).await.unwrap();
        assert_eq!(tokens.id_token.as_deref(), Some("BBB"));

        let calls = transport.calls();
        assert_eq!(calls.len(), 3);
        let pass_code = calls[1].body.as_ref().unwrap()["passCode"]
            .as_str()
            .unwrap()
            .to_string();
        assert_eq!(pass_code.len(), passcode::DIGITS);
        assert!(calls[2].url.contains("sessionToken=20111mfa"));
    }

    #[tokio::test]
    async fn test_auth_failure_skips_exchange() {
        let transport = MockTransport::new().with_reply(TestFixtures::authn_error(
            401,
            "E0000004",
            "Authentication failed",
        ));

        let err = fetch_tokens(&TestFixtures::settings(), &transport)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FlowError::Auth(AuthError::AuthenticationRejected { .. })
        ));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_settings_make_no_calls() {
        let mut settings = TestFixtures::settings();
        settings.provider.client_id = String::new();
        let transport = MockTransport::new();

        let err = fetch_tokens(&settings, &transport).await.unwrap_err();

        assert!(matches!(
            err,
            FlowError::Settings(SettingsError::Missing("provider.client_id"))
        ));
        assert_eq!(transport.call_count(), 0);
    }
}
