//! Human-readable token rendering for the command line
//!
//! Claims are decoded without signature verification; this is for looking at
//! tokens, not trusting them.

use crate::token::TokenResult;
use crate::utils::crypto::decode_jwt_payload;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fmt::Write as _;

/// Decode the claims of a JWT for display
///
/// # Errors
///
/// Returns an error if the token is not a JWT with a JSON payload.
pub fn decode_claims(token: &str) -> Result<Value, String> {
    decode_jwt_payload(token)
}

/// Render a timestamp claim (`exp`, `iat`, ...) as RFC 3339
#[must_use]
pub fn format_timestamp(claims: &Value, claim: &str) -> Option<String> {
    let seconds = claims.get(claim)?.as_i64()?;
    DateTime::<Utc>::from_timestamp(seconds, 0).map(|time| time.to_rfc3339())
}

/// Summary of one token: headline claims followed by the full claim set
///
/// Opaque (non-JWT) tokens are shown as-is.
#[must_use]
pub fn describe_token(label: &str, token: &str) -> String {
    let mut out = format!("{label}:\n  {token}\n");

    match decode_claims(token) {
        Ok(claims) => {
            for claim in ["sub", "iss", "aud", "cid", "scp"] {
                if let Some(value) = claims.get(claim) {
                    let _ = writeln!(out, "  {claim}: {}", render_value(value));
                }
            }
            for claim in ["iat", "exp"] {
                if let Some(time) = format_timestamp(&claims, claim) {
                    let _ = writeln!(out, "  {claim}: {time}");
                }
            }
            if let Ok(pretty) = serde_json::to_string_pretty(&claims) {
                let _ = writeln!(out, "  claims: {pretty}");
            }
        }
        Err(e) => {
            let _ = writeln!(out, "  (not decodable: {e})");
        }
    }

    out
}

/// Render every token in a result, ID token first
#[must_use]
pub fn describe_tokens(tokens: &TokenResult) -> String {
    let mut out = String::new();
    if let Some(id_token) = &tokens.id_token {
        out.push_str(&describe_token("ID token", id_token));
    }
    if let Some(access_token) = &tokens.access_token {
        out.push_str(&describe_token("Access token", access_token));
    }
    out
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .collect::<Vec<_>>()
            .join(" "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose, Engine as _};
    use serde_json::json;

    fn jwt(claims: &Value) -> String {
        let payload = general_purpose::URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("eyJhbGciOiJSUzI1NiJ9.{payload}.sig")
    }

    #[test]
    fn test_format_timestamp() {
        let claims = json!({"exp": 1_700_000_000});
        assert_eq!(
            format_timestamp(&claims, "exp").as_deref(),
            Some("2023-11-14T22:13:20+00:00")
        );
        assert_eq!(format_timestamp(&claims, "iat"), None);
    }

    #[test]
    fn test_describe_jwt() {
        let token = jwt(&json!({
            "sub": "00u1",
            "iss": "https://dev-123.okta.test/oauth2/default",
            "scp": ["openid", "email"],
            "exp": 1_700_000_000
        }));
        let rendered = describe_token("Access token", &token);

        assert!(rendered.starts_with("Access token:\n"));
        assert!(rendered.contains("  sub: 00u1\n"));
        assert!(rendered.contains("  scp: openid email\n"));
        assert!(rendered.contains("  exp: 2023-11-14T22:13:20+00:00\n"));
    }

    #[test]
    fn test_describe_opaque_token() {
        let rendered = describe_token("Access token", "opaque");
        assert!(rendered.contains("(not decodable: Invalid JWT format)"));
    }

    #[test]
    fn test_describe_tokens_skips_missing() {
        let tokens = TokenResult {
            id_token: Some(jwt(&json!({"sub": "00u1"}))),
            ..TokenResult::default()
        };
        let rendered = describe_tokens(&tokens);
        assert!(rendered.contains("ID token:"));
        assert!(!rendered.contains("Access token:"));
    }
}
