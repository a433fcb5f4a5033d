//! Identity provider endpoint construction
//!
//! A configured domain is normally a bare host (`dev-123.okta.com`) and is
//! addressed over HTTPS. A domain that already carries a scheme is used as-is,
//! which lets test harnesses point at a plain-HTTP stub provider.

/// Path of the primary (password) authentication endpoint
pub const AUTHN_PATH: &str = "/api/v1/authn";

/// Authorization server used when none is configured
pub const DEFAULT_AUTHORIZATION_SERVER: &str = "default";

/// Base URL for a provider domain, without a trailing slash
#[must_use]
pub fn base_url(domain: &str) -> String {
    let domain = domain.trim().trim_end_matches('/');
    if domain.starts_with("https://") || domain.starts_with("http://") {
        domain.to_string()
    } else {
        format!("https://{domain}")
    }
}

/// `POST` target for username/password authentication
#[must_use]
pub fn authn_url(domain: &str) -> String {
    format!("{}{AUTHN_PATH}", base_url(domain))
}

/// `GET` target for the authorize endpoint of an authorization server
#[must_use]
pub fn authorize_url(domain: &str, authorization_server: &str) -> String {
    let server = authorization_server.trim().trim_matches('/');
    let server = if server.is_empty() {
        DEFAULT_AUTHORIZATION_SERVER
    } else {
        server
    };
    format!("{}/oauth2/{server}/v1/authorize", base_url(domain))
}

/// Strip query and fragment from a URL before it is logged or put in an error
///
/// Authorize URLs carry the session token as a query parameter.
#[must_use]
pub fn redact_url(url: &str) -> String {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    url[..end].to_string()
}
