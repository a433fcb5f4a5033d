//! Session token to OAuth/OIDC token exchange
//!
//! The authorize endpoint answers with a `302` whose `Location` fragment holds
//! the tokens. The redirect is read, never followed: the redirect URI may not
//! be reachable from a headless test environment.

use crate::http::{HttpTransport, FOUND};
use crate::token::authorize::AuthorizeRequest;
use crate::token::errors::TokenError;
use crate::token::types::{TokenRequestParams, TokenResult};
use crate::utils::logging::LoggingHelper;
use std::collections::HashMap;

/// Exchanges a session token for tokens via the authorize endpoint
pub struct TokenExchanger<'a, T: HttpTransport + ?Sized> {
    transport: &'a T,
}

impl<'a, T: HttpTransport + ?Sized> TokenExchanger<'a, T> {
    #[must_use]
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Exchange the session token in `params` for tokens
    ///
    /// A fresh `state` and `nonce` are generated for the call. They are not
    /// checked against the response.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request cannot be built (`InvalidRequest`) or sent (`Transport`)
    /// - The response is not a `302` with a `Location` header (`NoRedirect`)
    /// - The fragment carries an `error_description` (`ProviderError`)
    /// - The fragment carries no tokens (`UnexpectedResponseShape`)
    pub async fn exchange_for_tokens(
        &self,
        params: &TokenRequestParams,
    ) -> Result<TokenResult, TokenError> {
        let request = AuthorizeRequest::new(params)?;
        LoggingHelper::log_token_exchange_start(
            &params.domain,
            params.response_type.as_str(),
            &params.scopes.serialize(),
        );
        self.send(&request).await
    }

    /// Send a prepared authorize request
    ///
    /// # Errors
    ///
    /// Same as [`exchange_for_tokens`](Self::exchange_for_tokens), minus
    /// `InvalidRequest`.
    pub async fn send(&self, request: &AuthorizeRequest) -> Result<TokenResult, TokenError> {
        let reply = self.transport.get_without_redirect(request.url()).await?;
        LoggingHelper::log_authorize_redirect(reply.status, reply.location.is_some());

        let location = match reply.location {
            Some(location) if reply.status == FOUND => location,
            _ => {
                return Err(TokenError::NoRedirect {
                    status: reply.status,
                    status_text: reply.status_text,
                })
            }
        };

        let result = parse_redirect_fragment(&location)?;
        LoggingHelper::log_token_exchange_summary(
            result.id_token.as_ref(),
            result.access_token.as_ref(),
            result.token_type.as_ref(),
            result.expires_in,
        );
        Ok(result)
    }
}

/// Read tokens, or the provider's error, from a redirect URL fragment
///
/// # Errors
///
/// Returns `ProviderError` when the fragment carries `error_description` (or a
/// bare `error`), and `UnexpectedResponseShape` when it carries no token.
pub fn parse_redirect_fragment(location: &str) -> Result<TokenResult, TokenError> {
    let fragment = location
        .split_once('#')
        .map_or("", |(_, fragment)| fragment);
    let mut values: HashMap<String, String> = url::form_urlencoded::parse(fragment.as_bytes())
        .into_owned()
        .filter(|(_, value)| !value.is_empty())
        .collect();

    let error = values.remove("error");
    if let Some(message) = values.remove("error_description") {
        return Err(TokenError::ProviderError { error, message });
    }
    if let Some(error) = error {
        return Err(TokenError::ProviderError {
            message: error.clone(),
            error: Some(error),
        });
    }

    let result = TokenResult {
        id_token: values.remove("id_token"),
        access_token: values.remove("access_token"),
        token_type: values.remove("token_type"),
        expires_in: values
            .remove("expires_in")
            .and_then(|value| value.parse().ok()),
        scope: values.remove("scope"),
        state: values.remove("state"),
    };

    if result.has_tokens() {
        Ok(result)
    } else {
        Err(TokenError::UnexpectedResponseShape {
            url: location.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpReply;
    use crate::testing::fixtures::TestFixtures;
    use crate::testing::mock::MockTransport;

    #[test]
    fn test_parse_both_tokens() {
        let result =
            parse_redirect_fragment("https://app.test/callback#access_token=AAA&id_token=BBB")
                .unwrap();
        assert_eq!(result.id_token.as_deref(), Some("BBB"));
        assert_eq!(result.access_token.as_deref(), Some("AAA"));
    }

    #[test]
    fn test_parse_full_fragment() {
        let result = parse_redirect_fragment(
            "https://app.test/callback#id_token=BBB&access_token=AAA&token_type=Bearer\
             &expires_in=3600&scope=openid+profile&state=xyz",
        )
        .unwrap();
        assert_eq!(result.token_type.as_deref(), Some("Bearer"));
        assert_eq!(result.expires_in, Some(3600));
        assert_eq!(result.scope.as_deref(), Some("openid profile"));
        assert_eq!(result.state.as_deref(), Some("xyz"));
    }

    #[test]
    fn test_parse_id_token_only_is_partial_success() {
        let result = parse_redirect_fragment("https://app.test/callback#id_token=BBB").unwrap();
        assert_eq!(result.id_token.as_deref(), Some("BBB"));
        assert_eq!(result.access_token, None);
    }

    #[test]
    fn test_parse_error_description() {
        let err = parse_redirect_fragment(
            "https://app.test/callback#error=invalid_scope&error_description=bad%20scope",
        )
        .unwrap_err();
        match err {
            TokenError::ProviderError { error, message } => {
                assert_eq!(message, "bad scope");
                assert_eq!(error.as_deref(), Some("invalid_scope"));
            }
            other => panic!("expected ProviderError, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_bare_error() {
        let err = parse_redirect_fragment("https://app.test/callback#error=login_required")
            .unwrap_err();
        assert!(matches!(
            err,
            TokenError::ProviderError { ref message, .. } if message == "login_required"
        ));
    }

    #[test]
    fn test_parse_without_fragment() {
        let err = parse_redirect_fragment("https://app.test/callback?code=abc").unwrap_err();
        match err {
            TokenError::UnexpectedResponseShape { url } => {
                assert_eq!(url, "https://app.test/callback?code=abc");
            }
            other => panic!("expected UnexpectedResponseShape, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exchange_returns_tokens_from_redirect() {
        let transport = MockTransport::new().with_reply(HttpReply::redirect(
            "https://app.test/callback#access_token=AAA&id_token=BBB",
        ));

        let result = TokenExchanger::new(&transport)
            .exchange_for_tokens(&TestFixtures::token_params("20111abc"))
            .await
            .unwrap();

        assert_eq!(result.id_token.as_deref(), Some("BBB"));
        assert_eq!(result.access_token.as_deref(), Some("AAA"));

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "GET");
        assert!(calls[0]
            .url
            .starts_with("https://dev-123.okta.test/oauth2/default/v1/authorize?"));
        assert!(calls[0].url.contains("&sessionToken=20111abc"));
    }

    #[tokio::test]
    async fn test_exchange_provider_error() {
        let transport = MockTransport::new().with_reply(HttpReply::redirect(
            "https://app.test/callback#error_description=bad%20scope",
        ));

        let err = TokenExchanger::new(&transport)
            .exchange_for_tokens(&TestFixtures::token_params("20111abc"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TokenError::ProviderError { ref message, .. } if message == "bad scope"
        ));
    }

    #[tokio::test]
    async fn test_exchange_non_redirect() {
        let transport = MockTransport::new().with_reply(HttpReply::new(200, "<html></html>"));

        let err = TokenExchanger::new(&transport)
            .exchange_for_tokens(&TestFixtures::token_params("20111abc"))
            .await
            .unwrap_err();

        match err {
            TokenError::NoRedirect {
                status,
                status_text,
            } => {
                assert_eq!(status, 200);
                assert_eq!(status_text, "OK");
            }
            other => panic!("expected NoRedirect, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_exchange_redirect_without_location() {
        let transport = MockTransport::new().with_reply(HttpReply::new(302, ""));

        let err = TokenExchanger::new(&transport)
            .exchange_for_tokens(&TestFixtures::token_params("20111abc"))
            .await
            .unwrap_err();

        assert!(matches!(err, TokenError::NoRedirect { status: 302, .. }));
    }

    #[tokio::test]
    async fn test_exchange_uses_fresh_state_and_nonce() {
        let transport = MockTransport::new()
            .with_reply(HttpReply::redirect("https://app.test/callback#id_token=A"))
            .with_reply(HttpReply::redirect("https://app.test/callback#id_token=B"))
            .with_reply(HttpReply::redirect("https://app.test/callback#id_token=C"));
        let exchanger = TokenExchanger::new(&transport);
        let params = TestFixtures::token_params("20111abc");

        for _ in 0..3 {
            exchanger.exchange_for_tokens(&params).await.unwrap();
        }

        let mut seen = std::collections::HashSet::new();
        for call in transport.calls() {
            let parsed = url::Url::parse(&call.url).unwrap();
            for (key, value) in parsed.query_pairs() {
                if key == "state" || key == "nonce" {
                    assert!(seen.insert(value.into_owned()), "value reused: {key}");
                }
            }
        }
        assert_eq!(seen.len(), 6);
    }
}
