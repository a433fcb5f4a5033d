//! Testing utilities for autotoken
//!
//! - [`fixtures`] - Provider response documents, settings and credentials
//! - [`mock`] - A scripted, recording [`HttpTransport`](crate::http::HttpTransport)
//!
//! ## Usage (with the `testing` feature)
//!
//! ```rust,ignore
//! use autotoken::authn::SessionAuthenticator;
//! use autotoken::testing::{fixtures::TestFixtures, mock::MockTransport};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let transport = MockTransport::new().with_reply(TestFixtures::authn_success("20111abc"));
//! let token = SessionAuthenticator::new(&transport)
//!     .authenticate(&TestFixtures::credentials())
//!     .await
//!     .unwrap();
//! assert_eq!(token, "20111abc");
//! assert_eq!(transport.call_count(), 1);
//! # });
//! ```

pub mod fixtures;
pub mod mock;

pub use fixtures::TestFixtures;
pub use mock::{MockTransport, RecordedCall};
