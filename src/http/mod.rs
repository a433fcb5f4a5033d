//! HTTP transport abstraction
//!
//! The session authenticator and the token exchanger reach the identity
//! provider only through [`HttpTransport`]. Production code uses
//! [`ReqwestTransport`]; tests substitute a recording mock so the number and
//! shape of network calls can be asserted.

mod reqwest_transport;

pub use reqwest_transport::ReqwestTransport;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Status code the authorize endpoint answers with when it issues tokens
pub const FOUND: u16 = 302;

/// The parts of a provider response the protocol cares about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub status_text: String,
    pub location: Option<String>,
    pub body: String,
}

impl HttpReply {
    /// Create a reply with the canonical reason phrase for `status`
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: canonical_status_text(status),
            location: None,
            body: body.into(),
        }
    }

    /// Create a `302 Found` reply pointing at `location`
    #[must_use]
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::new(FOUND, String::new()).with_location(location)
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

fn canonical_status_text(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason())
        .unwrap_or_default()
        .to_string()
}

/// Network, DNS or TLS failure; the request never produced a response
#[derive(Debug, Clone, Error)]
#[error("{method} {url} failed: {message}")]
pub struct TransportError {
    pub method: &'static str,
    /// Request URL with query and fragment removed
    pub url: String,
    pub message: String,
}

/// Transport used by the protocol client
///
/// Implementations must not follow redirects on
/// [`get_without_redirect`](HttpTransport::get_without_redirect) and must not
/// retry failed requests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// `POST` a JSON document and return the response
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if no response was received.
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpReply, TransportError>;

    /// `GET` a URL, returning a redirect response as-is instead of following it
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if no response was received.
    async fn get_without_redirect(&self, url: &str) -> Result<HttpReply, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_status_text() {
        let reply = HttpReply::new(200, "{}");
        assert_eq!(reply.status_text, "OK");

        let redirect = HttpReply::redirect("https://app.test/cb#id_token=x");
        assert_eq!(redirect.status, FOUND);
        assert_eq!(redirect.status_text, "Found");
        assert_eq!(redirect.location.as_deref(), Some("https://app.test/cb#id_token=x"));
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError {
            method: "POST",
            url: "https://idp.test/api/v1/authn".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "POST https://idp.test/api/v1/authn failed: connection refused"
        );
    }
}
