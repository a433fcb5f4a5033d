//! Token exchange errors

use crate::http::TransportError;
use thiserror::Error;

/// Errors raised while exchanging a session token for OAuth/OIDC tokens
///
/// Every variant is terminal; nothing is retried.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The request never produced a response
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The authorize call did not answer with a `302` and a `Location` header
    #[error("Authorize endpoint did not redirect: {status} {status_text}")]
    NoRedirect { status: u16, status_text: String },

    /// The redirect fragment carried an explicit error
    #[error("Identity provider error: {message}")]
    ProviderError {
        error: Option<String>,
        message: String,
    },

    /// The redirect carried neither tokens nor an error
    #[error("Unexpected authorize redirect: {url}")]
    UnexpectedResponseShape { url: String },

    /// The authorize URL could not be built from the parameters
    #[error("Invalid token request: {0}")]
    InvalidRequest(String),
}
