//! Session authentication module
//!
//! Exchanges username/password credentials, plus a TOTP passcode when the
//! provider mandates multi-factor authentication, for a single-use session
//! token.

pub mod errors;
pub mod service;
pub mod types;

pub use errors::AuthError;
pub use service::SessionAuthenticator;
pub use types::{
    select_totp_factor, AuthenticationResult, AuthnResponse, AuthnStatus, Credentials, Factor,
    SOFTWARE_TOTP_FACTOR,
};
