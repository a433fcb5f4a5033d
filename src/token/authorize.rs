//! Authorize request construction
//!
//! Every request carries a fresh `state` and `nonce`. Both are kept on the
//! [`AuthorizeRequest`] so a caller can compare them with what comes back.

use crate::token::errors::TokenError;
use crate::token::types::TokenRequestParams;
use crate::utils::crypto::generate_request_nonce;
use crate::utils::endpoints::authorize_url;
use urlencoding::encode;

/// A single-use authorize request
pub struct AuthorizeRequest {
    url: String,
    state: String,
    nonce: String,
}

impl AuthorizeRequest {
    /// Build a request with newly generated `state` and `nonce`
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if a required parameter is empty or the
    /// resulting URL does not parse.
    pub fn new(params: &TokenRequestParams) -> Result<Self, TokenError> {
        Self::with_state_and_nonce(params, generate_request_nonce(), generate_request_nonce())
    }

    fn with_state_and_nonce(
        params: &TokenRequestParams,
        state: String,
        nonce: String,
    ) -> Result<Self, TokenError> {
        for (name, value) in [
            ("domain", &params.domain),
            ("session token", &params.session_token),
            ("client id", &params.client_id),
            ("redirect uri", &params.redirect_uri),
        ] {
            if value.trim().is_empty() {
                return Err(TokenError::InvalidRequest(format!("{name} is empty")));
            }
        }
        if params.scopes.is_empty() {
            return Err(TokenError::InvalidRequest(
                "at least one scope is required".to_string(),
            ));
        }

        // The scope value is pre-encoded: its `+` delimiters must reach the
        // provider unescaped.
        let query = [
            ("response_type", encode(params.response_type.as_str()).into_owned()),
            ("scope", params.scopes.to_query_value()),
            ("state", encode(&state).into_owned()),
            ("nonce", encode(&nonce).into_owned()),
            ("client_id", encode(&params.client_id).into_owned()),
            ("redirect_uri", encode(&params.redirect_uri).into_owned()),
            ("sessionToken", encode(&params.session_token).into_owned()),
        ]
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

        let url = format!(
            "{}?{query}",
            authorize_url(&params.domain, &params.authorization_server)
        );
        url::Url::parse(&url)
            .map_err(|e| TokenError::InvalidRequest(format!("invalid authorize URL: {e}")))?;

        Ok(Self { url, state, nonce })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn state(&self) -> &str {
        &self.state
    }

    #[must_use]
    pub fn nonce(&self) -> &str {
        &self.nonce
    }
}
