//! Mock transport for testing the protocol client without a network
//!
//! [`MockTransport`] replays canned replies in order and records every call,
//! so tests can assert how many round trips a flow made and what was sent.

use crate::http::{HttpReply, HttpTransport, TransportError};
use crate::utils::endpoints::redact_url;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// A request observed by [`MockTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: &'static str,
    pub url: String,
    pub body: Option<Value>,
}

/// Scripted [`HttpTransport`]
///
/// Each call consumes the next queued reply. Once the queue is empty every
/// further call fails with a [`TransportError`].
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<HttpReply, String>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply
    #[must_use]
    pub fn with_reply(self, reply: HttpReply) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(reply));
        self
    }

    /// Queue a transport failure
    #[must_use]
    pub fn with_failure(self, message: &str) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(message.to_string()));
        self
    }

    /// All calls made so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn respond(
        &self,
        method: &'static str,
        url: &str,
        body: Option<Value>,
    ) -> Result<HttpReply, TransportError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                method,
                url: url.to_string(),
                body,
            });

        let next = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match next {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(TransportError {
                method,
                url: redact_url(url),
                message,
            }),
            None => Err(TransportError {
                method,
                url: redact_url(url),
                message: "no canned reply left".to_string(),
            }),
        }
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<HttpReply, TransportError> {
        self.respond("POST", url, Some(body.clone()))
    }

    async fn get_without_redirect(&self, url: &str) -> Result<HttpReply, TransportError> {
        self.respond("GET", url, None)
    }
}
