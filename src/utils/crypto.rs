// Cryptographic utilities for generating single-use request values and
// inspecting issued tokens

use base64::{engine::general_purpose, Engine as _};
use rand::RngCore;

/// Byte length of the `state` and `nonce` values sent on every authorize request
pub const REQUEST_NONCE_BYTES: usize = 24;

/// Generate a cryptographically secure nonce of specified byte length
///
/// The bytes come from the thread-local CSPRNG, which is seeded from the
/// operating system.
///
/// # Arguments
///
/// * `length` - Number of bytes to generate (16 or more for request binding)
///
/// # Returns
///
/// A base64url-encoded string (no padding) of the generated bytes
#[must_use]
pub fn generate_nonce(length: usize) -> String {
    let mut nonce = vec![0u8; length];
    rand::rng().fill_bytes(&mut nonce);
    general_purpose::URL_SAFE_NO_PAD.encode(nonce)
}

/// Generate a `state` / `nonce` value for an authorize request
///
/// 24 bytes (192 bits) of entropy, 32 characters once encoded.
#[must_use]
pub fn generate_request_nonce() -> String {
    generate_nonce(REQUEST_NONCE_BYTES)
}

/// Helper function to decode JWT token payload without verification
/// This is used for display purposes only to inspect token claims
///
/// # Errors
///
/// Returns an error if:
/// - The JWT format is invalid (not 3 parts separated by dots)
/// - Base64 decoding fails
/// - UTF-8 decoding fails
/// - JSON parsing fails
pub fn decode_jwt_payload(token: &str) -> Result<serde_json::Value, String> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid JWT format".to_string());
    }

    let payload_b64 = parts[1];
    let payload_bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload_b64)
        .or_else(|_| general_purpose::STANDARD.decode(payload_b64))
        .map_err(|_| "Base64 decode failed")?;

    let payload_str = String::from_utf8(payload_bytes).map_err(|_| "UTF-8 decode failed")?;

    serde_json::from_str(&payload_str).map_err(|_| "JSON parse failed".to_string())
}
