//! chirp - Twitter API client with application-only authentication
//!
//! This library wraps the OAuth2 client-credentials flow and the user
//! timeline endpoint behind a session-centric API. All authenticated
//! operations flow through a [`Session`] object, which fetches a bearer token
//! on first use and transparently replaces it once when the platform reports
//! it invalid or expired.
//!
//! # Example
//!
//! ```no_run
//! use chirp::{Config, Session, UserTimelineOptions};
//!
//! # async fn example() -> Result<(), chirp::Error> {
//! let session = Session::new(Config::new("api-key", "api-secret"))?;
//!
//! let options = UserTimelineOptions {
//!     count: Some(5),
//!     screen_name: Some("twitterapi".to_string()),
//!     ..Default::default()
//! };
//!
//! for tweet in session.user_timeline(&options).await? {
//!     println!("{}: {}", tweet.id, tweet.text);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod timeline;
pub mod transport;
pub mod types;

// Re-export primary types at crate root for convenience
pub use auth::{BearerToken, Credentials, Session};
pub use config::{Config, SenderOptions};
pub use error::{ApiError, ApiErrors, Error, INVALID_OR_EXPIRED_TOKEN};
pub use timeline::{Tweet, UserTimelineOptions};
pub use transport::{ApiRequest, HttpSender, RequestDecorator, ReqwestSender, Transport};
pub use types::ApiUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
