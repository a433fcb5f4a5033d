//! Primary authentication data types
//!
//! The provider answers `/api/v1/authn` and factor verification with the same
//! JSON document whose meaning depends on its `status` field.
//! [`AuthnResponse::into_result`] decodes it into an exhaustive
//! [`AuthenticationResult`].

use serde::Deserialize;
use std::fmt;

/// Factor type identifying a software time-based one-time passcode
pub const SOFTWARE_TOTP_FACTOR: &str = "token:software:totp";

/// Username/password credentials plus an optional one-time passcode
#[derive(Clone)]
pub struct Credentials {
    pub domain: String,
    pub username: String,
    pub password: String,
    pub pass_code: Option<String>,
}

impl Credentials {
    #[must_use]
    pub fn new(
        domain: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            username: username.into(),
            password: password.into(),
            pass_code: None,
        }
    }

    #[must_use]
    pub fn with_pass_code(mut self, pass_code: impl Into<String>) -> Self {
        self.pass_code = Some(pass_code.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("domain", &self.domain)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("pass_code", &self.pass_code.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Transaction status reported by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthnStatus {
    Success,
    MfaRequired,
    MfaChallenge,
    MfaEnroll,
    LockedOut,
    PasswordExpired,
    Other(String),
}

impl From<&str> for AuthnStatus {
    fn from(value: &str) -> Self {
        match value {
            "SUCCESS" => Self::Success,
            "MFA_REQUIRED" => Self::MfaRequired,
            "MFA_CHALLENGE" => Self::MfaChallenge,
            "MFA_ENROLL" => Self::MfaEnroll,
            "LOCKED_OUT" => Self::LockedOut,
            "PASSWORD_EXPIRED" => Self::PasswordExpired,
            other => Self::Other(other.to_string()),
        }
    }
}

impl fmt::Display for AuthnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("SUCCESS"),
            Self::MfaRequired => f.write_str("MFA_REQUIRED"),
            Self::MfaChallenge => f.write_str("MFA_CHALLENGE"),
            Self::MfaEnroll => f.write_str("MFA_ENROLL"),
            Self::LockedOut => f.write_str("LOCKED_OUT"),
            Self::PasswordExpired => f.write_str("PASSWORD_EXPIRED"),
            Self::Other(status) => f.write_str(status),
        }
    }
}

/// An enrolled second factor the provider offers for verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factor {
    pub factor_type: String,
    pub provider: Option<String>,
    pub verification_link: String,
}

impl Factor {
    #[must_use]
    pub fn is_software_totp(&self) -> bool {
        self.factor_type == SOFTWARE_TOTP_FACTOR
    }
}

/// Decoded outcome of one authentication round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthenticationResult {
    /// The provider issued a session token
    Success { session_token: String },
    /// A second factor must be verified before a session token is issued
    MfaRequired {
        state_token: String,
        factors: Vec<Factor>,
    },
    /// Anything else: bad credentials, locked account, unsupported status
    Failure { status: String, message: String },
}

/// Raw authentication response document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthnResponse {
    pub status: Option<String>,
    pub session_token: Option<String>,
    pub state_token: Option<String>,
    #[serde(rename = "_embedded")]
    pub embedded: Option<AuthnEmbedded>,
    pub error_code: Option<String>,
    pub error_summary: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthnEmbedded {
    #[serde(default)]
    pub factors: Vec<FactorEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorEntry {
    pub factor_type: Option<String>,
    pub provider: Option<String>,
    #[serde(rename = "_links")]
    pub links: Option<FactorLinks>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FactorLinks {
    pub verify: Option<Link>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub href: String,
}

impl FactorEntry {
    /// Convert to a [`Factor`]; untyped entries and entries without a verify
    /// link cannot be answered
    fn into_factor(self) -> Option<Factor> {
        let factor_type = self.factor_type?;
        let verification_link = self.links?.verify?.href;
        Some(Factor {
            factor_type,
            provider: self.provider,
            verification_link,
        })
    }
}

impl AuthnResponse {
    /// Decoded `status` field, if the provider sent one
    #[must_use]
    pub fn authn_status(&self) -> Option<AuthnStatus> {
        self.status.as_deref().map(AuthnStatus::from)
    }

    /// Decode the response into an exhaustive result
    ///
    /// A non-empty session token means success whatever the status says.
    /// Error documents carry no `status`; their `errorCode` stands in for it.
    #[must_use]
    pub fn into_result(self) -> AuthenticationResult {
        let status = self.authn_status();

        if let Some(session_token) = self.session_token.filter(|token| !token.is_empty()) {
            return AuthenticationResult::Success { session_token };
        }

        match status {
            Some(AuthnStatus::MfaRequired) => match self.state_token.filter(|t| !t.is_empty()) {
                Some(state_token) => AuthenticationResult::MfaRequired {
                    state_token,
                    factors: self
                        .embedded
                        .map(|embedded| {
                            embedded
                                .factors
                                .into_iter()
                                .filter_map(FactorEntry::into_factor)
                                .collect()
                        })
                        .unwrap_or_default(),
                },
                None => AuthenticationResult::Failure {
                    status: AuthnStatus::MfaRequired.to_string(),
                    message: "MFA_REQUIRED response carried no stateToken".to_string(),
                },
            },
            Some(AuthnStatus::Success) => AuthenticationResult::Failure {
                status: AuthnStatus::Success.to_string(),
                message: "SUCCESS response carried no sessionToken".to_string(),
            },
            other => AuthenticationResult::Failure {
                status: other
                    .map(|s| s.to_string())
                    .or(self.error_code)
                    .unwrap_or_else(|| "UNKNOWN".to_string()),
                message: self
                    .error_summary
                    .unwrap_or_else(|| "authentication was not successful".to_string()),
            },
        }
    }
}

/// First enrolled software TOTP factor, in provider order
#[must_use]
pub fn select_totp_factor(factors: &[Factor]) -> Option<&Factor> {
    factors.iter().find(|factor| factor.is_software_totp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: serde_json::Value) -> AuthenticationResult {
        serde_json::from_value::<AuthnResponse>(value)
            .unwrap()
            .into_result()
    }

    fn factor(factor_type: &str, link: &str) -> Factor {
        Factor {
            factor_type: factor_type.to_string(),
            provider: Some("OKTA".to_string()),
            verification_link: link.to_string(),
        }
    }

    #[test]
    fn test_success_response() {
        let result = decode(json!({"status": "SUCCESS", "sessionToken": "20111abc"}));
        assert_eq!(
            result,
            AuthenticationResult::Success {
                session_token: "20111abc".to_string()
            }
        );
    }

    #[test]
    fn test_session_token_without_status_is_success() {
        let result = decode(json!({"sessionToken": "20111abc"}));
        assert!(matches!(result, AuthenticationResult::Success { .. }));
    }

    #[test]
    fn test_success_without_session_token_is_failure() {
        let result = decode(json!({"status": "SUCCESS"}));
        assert!(matches!(
            result,
            AuthenticationResult::Failure { ref status, .. } if status == "SUCCESS"
        ));
    }

    #[test]
    fn test_mfa_required_response() {
        let result = decode(json!({
            "status": "MFA_REQUIRED",
            "stateToken": "00state",
            "_embedded": {
                "factors": [
                    {
                        "id": "sms1",
                        "factorType": "sms",
                        "provider": "OKTA",
                        "_links": {"verify": {"href": "https://idp.test/api/v1/authn/factors/sms1/verify"}}
                    },
                    {
                        "id": "totp1",
                        "factorType": "token:software:totp",
                        "provider": "GOOGLE",
                        "_links": {"verify": {"href": "https://idp.test/api/v1/authn/factors/totp1/verify"}}
                    },
                    {
                        "id": "push1",
                        "factorType": "push",
                        "provider": "OKTA"
                    }
                ]
            }
        }));

        let (state_token, factors) = match result {
            AuthenticationResult::MfaRequired {
                state_token,
                factors,
            } => (state_token, factors),
            other => panic!("expected MfaRequired, got {other:?}"),
        };
        assert_eq!(state_token, "00state");
        // The push factor has no verify link and is dropped
        assert_eq!(factors.len(), 2);
        assert_eq!(factors[1].factor_type, SOFTWARE_TOTP_FACTOR);
        assert_eq!(factors[1].provider.as_deref(), Some("GOOGLE"));
    }

    #[test]
    fn test_untyped_factor_entry_is_skipped() {
        let result = decode(json!({
            "status": "MFA_REQUIRED",
            "stateToken": "00state",
            "_embedded": {
                "factors": [
                    {
                        "id": "odd1",
                        "_links": {"verify": {"href": "https://idp.test/api/v1/authn/factors/odd1/verify"}}
                    },
                    {
                        "id": "totp1",
                        "factorType": "token:software:totp",
                        "_links": {"verify": {"href": "https://idp.test/api/v1/authn/factors/totp1/verify"}}
                    }
                ]
            }
        }));

        match result {
            AuthenticationResult::MfaRequired { factors, .. } => {
                assert_eq!(factors.len(), 1);
                assert_eq!(
                    select_totp_factor(&factors).unwrap().verification_link,
                    "https://idp.test/api/v1/authn/factors/totp1/verify"
                );
            }
            other => panic!("expected MfaRequired, got {other:?}"),
        }
    }

    #[test]
    fn test_mfa_required_without_state_token_is_failure() {
        let result = decode(json!({"status": "MFA_REQUIRED"}));
        assert!(matches!(
            result,
            AuthenticationResult::Failure { ref status, .. } if status == "MFA_REQUIRED"
        ));
    }

    #[test]
    fn test_error_document_uses_error_code() {
        let result = decode(json!({
            "errorCode": "E0000004",
            "errorSummary": "Authentication failed",
            "errorCauses": []
        }));
        assert_eq!(
            result,
            AuthenticationResult::Failure {
                status: "E0000004".to_string(),
                message: "Authentication failed".to_string()
            }
        );
    }

    #[test]
    fn test_locked_out_status() {
        let result = decode(json!({"status": "LOCKED_OUT"}));
        assert_eq!(
            result,
            AuthenticationResult::Failure {
                status: "LOCKED_OUT".to_string(),
                message: "authentication was not successful".to_string()
            }
        );
    }

    #[test]
    fn test_select_totp_factor_takes_first_match() {
        let factors = vec![
            factor("sms", "https://idp.test/sms"),
            factor(SOFTWARE_TOTP_FACTOR, "https://idp.test/totp-first"),
            factor(SOFTWARE_TOTP_FACTOR, "https://idp.test/totp-second"),
        ];
        let selected = select_totp_factor(&factors).unwrap();
        assert_eq!(selected.verification_link, "https://idp.test/totp-first");
    }

    #[test]
    fn test_select_totp_factor_none_enrolled() {
        let factors = vec![factor("sms", "https://idp.test/sms")];
        assert!(select_totp_factor(&factors).is_none());
        assert!(select_totp_factor(&[]).is_none());
    }

    #[test]
    fn test_credentials_debug_redacts_secrets() {
        let credentials =
            Credentials::new("idp.test", "tester@example.com", "hunter2").with_pass_code("123456");
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("tester@example.com"));
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("123456"));
    }
}
