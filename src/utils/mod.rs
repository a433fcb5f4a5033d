pub mod crypto;
pub mod endpoints;
pub mod logging;

// Re-export commonly used items for convenience
pub use crypto::{decode_jwt_payload, generate_nonce, generate_request_nonce};
pub use logging::LoggingHelper;
