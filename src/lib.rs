#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the autotoken application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod authn;
pub mod display;
pub mod flow;
pub mod http;
pub mod passcode;
pub mod settings;
pub mod token;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use authn::{AuthError, Credentials, SessionAuthenticator};
pub use flow::{fetch_tokens, ClientConfig, FlowError, TokenFlow};
pub use http::{HttpReply, HttpTransport, ReqwestTransport, TransportError};
pub use settings::AutotokenSettings;
pub use token::{
    AuthorizeRequest, ResponseType, Scopes, TokenError, TokenExchanger, TokenRequestParams,
    TokenResult,
};
