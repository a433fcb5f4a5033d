//! Token request and result types

use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Delimiter between scopes in the authorize request
pub const SCOPE_DELIMITER: char = '+';

/// Which tokens the authorize endpoint should issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseType {
    /// `token`: access token only
    AccessToken,
    /// `id_token`: ID token only
    IdToken,
    /// `id_token token`: both
    #[default]
    Both,
}

impl ResponseType {
    /// Value of the `response_type` query parameter
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccessToken => "token",
            Self::IdToken => "id_token",
            Self::Both => "id_token token",
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown response type '{0}' (expected 'token', 'id_token' or 'id_token token')")]
pub struct ParseResponseTypeError(pub String);

impl FromStr for ResponseType {
    type Err = ParseResponseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts: Vec<&str> = s
            .split(|c: char| c.is_whitespace() || c == '+' || c == ',')
            .filter(|part| !part.is_empty())
            .collect();
        parts.sort_unstable();
        parts.dedup();

        match parts.as_slice() {
            ["token"] | ["access_token"] => Ok(Self::AccessToken),
            ["id_token"] => Ok(Self::IdToken),
            ["id_token", "token"] | ["both"] => Ok(Self::Both),
            _ => Err(ParseResponseTypeError(s.to_string())),
        }
    }
}

/// Ordered, duplicate-free scope list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scopes(Vec<String>);

impl Scopes {
    /// Build from any sequence, dropping blanks and repeats but keeping the
    /// first-seen order
    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered: Vec<String> = Vec::new();
        for scope in scopes {
            let scope = scope.as_ref().trim();
            if !scope.is_empty() && !ordered.iter().any(|s| s == scope) {
                ordered.push(scope.to_string());
            }
        }
        Self(ordered)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Scopes joined with `+` in input order, e.g. `openid+profile+email`
    #[must_use]
    pub fn serialize(&self) -> String {
        serialize_scopes(&self.0)
    }

    /// Scope parameter value for the authorize URL
    ///
    /// Each scope is percent-encoded on its own; the `+` delimiters stay literal
    /// so the provider reads them as spaces.
    #[must_use]
    pub fn to_query_value(&self) -> String {
        self.0
            .iter()
            .map(|scope| urlencoding::encode(scope).into_owned())
            .collect::<Vec<_>>()
            .join(&SCOPE_DELIMITER.to_string())
    }
}

impl Default for Scopes {
    fn default() -> Self {
        Self::new(["openid", "profile", "email"])
    }
}

impl fmt::Display for Scopes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

/// Join scopes with `+`, preserving order
#[must_use]
pub fn serialize_scopes<S: AsRef<str>>(scopes: &[S]) -> String {
    scopes
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(&SCOPE_DELIMITER.to_string())
}

/// Everything the authorize request needs apart from `state` and `nonce`
#[derive(Clone)]
pub struct TokenRequestParams {
    pub domain: String,
    pub session_token: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub scopes: Scopes,
    pub response_type: ResponseType,
    pub authorization_server: String,
}

impl fmt::Debug for TokenRequestParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRequestParams")
            .field("domain", &self.domain)
            .field("session_token", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .field("response_type", &self.response_type)
            .field("authorization_server", &self.authorization_server)
            .finish()
    }
}

/// Tokens read from the redirect fragment
///
/// At least one of `id_token` / `access_token` is set when returned by the
/// exchanger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TokenResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// `state` echoed back by the provider; not checked by the exchanger
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl TokenResult {
    #[must_use]
    pub fn has_tokens(&self) -> bool {
        self.id_token.is_some() || self.access_token.is_some()
    }
}
