//! Test fixtures providing pre-built test objects
//!
//! Provider documents mirror what `/api/v1/authn` and factor verification
//! actually return, trimmed to the fields the client reads.

use crate::authn::{Credentials, SOFTWARE_TOTP_FACTOR};
use crate::http::HttpReply;
use crate::settings::{AutotokenSettings, CredentialSettings, ProviderSettings};
use crate::token::{ResponseType, Scopes, TokenRequestParams};
use serde_json::{json, Value};

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    pub const DOMAIN: &'static str = "dev-123.okta.test";
    pub const CLIENT_ID: &'static str = "0oa1client";
    pub const REDIRECT_URI: &'static str = "https://app.test/callback";
    pub const USERNAME: &'static str = "tester@example.com";
    pub const PASSWORD: &'static str = "correct-horse";
    pub const STATE_TOKEN: &'static str = "00stateToken";
    pub const TOTP_VERIFY_URL: &'static str =
        "https://dev-123.okta.test/api/v1/authn/factors/uft1totp/verify";
    pub const SMS_VERIFY_URL: &'static str =
        "https://dev-123.okta.test/api/v1/authn/factors/sms1/verify";
    /// base32 of the RFC 6238 SHA-1 test key
    pub const TOTP_SECRET: &'static str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

    /// Credentials without a passcode
    #[must_use]
    pub fn credentials() -> Credentials {
        Credentials::new(Self::DOMAIN, Self::USERNAME, Self::PASSWORD)
    }

    /// Complete, valid settings without a TOTP secret
    #[must_use]
    pub fn settings() -> AutotokenSettings {
        AutotokenSettings {
            provider: ProviderSettings {
                domain: Self::DOMAIN.to_string(),
                client_id: Self::CLIENT_ID.to_string(),
                redirect_uri: Self::REDIRECT_URI.to_string(),
                ..ProviderSettings::default()
            },
            credentials: CredentialSettings {
                username: Self::USERNAME.to_string(),
                password: Self::PASSWORD.to_string(),
                totp_secret: None,
            },
            ..AutotokenSettings::default()
        }
    }

    /// Authorize parameters for a session token
    #[must_use]
    pub fn token_params(session_token: &str) -> TokenRequestParams {
        TokenRequestParams {
            domain: Self::DOMAIN.to_string(),
            session_token: session_token.to_string(),
            client_id: Self::CLIENT_ID.to_string(),
            redirect_uri: Self::REDIRECT_URI.to_string(),
            scopes: Scopes::default(),
            response_type: ResponseType::Both,
            authorization_server: "default".to_string(),
        }
    }

    /// `200` with `status: SUCCESS`
    #[must_use]
    pub fn authn_success(session_token: &str) -> HttpReply {
        Self::json_reply(
            200,
            &json!({
                "expiresAt": "2026-10-19T12:05:00.000Z",
                "status": "SUCCESS",
                "sessionToken": session_token,
                "_embedded": {
                    "user": {
                        "id": "00u1user",
                        "profile": {"login": Self::USERNAME}
                    }
                }
            }),
        )
    }

    /// `200` with `status: MFA_REQUIRED` offering `factors`
    #[must_use]
    pub fn authn_mfa_required(factors: &[Value]) -> HttpReply {
        Self::json_reply(
            200,
            &json!({
                "stateToken": Self::STATE_TOKEN,
                "expiresAt": "2026-10-19T12:05:00.000Z",
                "status": "MFA_REQUIRED",
                "_embedded": {
                    "user": {"id": "00u1user"},
                    "factors": factors
                }
            }),
        )
    }

    /// Provider error document, e.g. `401` / `E0000004`
    #[must_use]
    pub fn authn_error(status: u16, error_code: &str, error_summary: &str) -> HttpReply {
        Self::json_reply(
            status,
            &json!({
                "errorCode": error_code,
                "errorSummary": error_summary,
                "errorLink": error_code,
                "errorId": "oaeTestErrorId",
                "errorCauses": []
            }),
        )
    }

    /// Enrolled Google Authenticator factor
    #[must_use]
    pub fn totp_factor_entry() -> Value {
        json!({
            "id": "uft1totp",
            "factorType": SOFTWARE_TOTP_FACTOR,
            "provider": "GOOGLE",
            "vendorName": "GOOGLE",
            "_links": {
                "verify": {
                    "href": Self::TOTP_VERIFY_URL,
                    "hints": {"allow": ["POST"]}
                }
            }
        })
    }

    /// Enrolled SMS factor
    #[must_use]
    pub fn sms_factor_entry() -> Value {
        json!({
            "id": "sms1",
            "factorType": "sms",
            "provider": "OKTA",
            "_links": {
                "verify": {
                    "href": Self::SMS_VERIFY_URL,
                    "hints": {"allow": ["POST"]}
                }
            }
        })
    }

    fn json_reply(status: u16, body: &Value) -> HttpReply {
        HttpReply::new(status, body.to_string())
    }
}
