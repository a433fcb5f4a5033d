use super::{HttpReply, HttpTransport, TransportError};
use crate::settings::HttpSettings;
use crate::utils::endpoints::redact_url;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, LOCATION};
use reqwest::redirect::Policy;
use serde_json::Value;
use std::time::Duration;

/// [`HttpTransport`] backed by a `reqwest::Client` that never follows redirects
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport with the given request timeout and user agent
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .timeout(timeout)
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    /// Build a transport from the `[http]` settings section
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn from_settings(settings: &HttpSettings) -> Result<Self, reqwest::Error> {
        Self::new(
            Duration::from_secs(settings.timeout_seconds),
            &settings.user_agent,
        )
    }

    async fn into_reply(
        method: &'static str,
        url: &str,
        response: reqwest::Response,
    ) -> Result<HttpReply, TransportError> {
        let status = response.status();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(method, url, e))?;

        Ok(HttpReply {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            location,
            body,
        })
    }
}

fn transport_error(method: &'static str, url: &str, err: reqwest::Error) -> TransportError {
    // reqwest embeds the full URL, query included, in its message
    let err = err.without_url();
    let message = match std::error::Error::source(&err) {
        Some(source) => format!("{err}: {source}"),
        None => err.to_string(),
    };
    TransportError {
        method,
        url: redact_url(url),
        message,
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpReply, TransportError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error("POST", url, e))?;
        Self::into_reply("POST", url, response).await
    }

    async fn get_without_redirect(&self, url: &str) -> Result<HttpReply, TransportError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error("GET", url, e))?;
        Self::into_reply("GET", url, response).await
    }
}
