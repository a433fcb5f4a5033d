//! Token exchange module
//!
//! Turns a session token into OAuth/OIDC tokens through a redirect-based
//! authorize request, reading the tokens from the redirect's URL fragment.

pub mod authorize;
pub mod errors;
pub mod exchange;
pub mod types;

pub use authorize::AuthorizeRequest;
pub use errors::TokenError;
pub use exchange::{parse_redirect_fragment, TokenExchanger};
pub use types::{
    serialize_scopes, ParseResponseTypeError, ResponseType, Scopes, TokenRequestParams,
    TokenResult,
};
