//! API credentials type.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{HeaderValue, InvalidHeaderValue};

/// API key and secret used for the client-credentials grant.
///
/// # Security
///
/// The secret is never exposed in Debug output to prevent accidental logging.
///
/// # Example
///
/// ```
/// use chirp::Credentials;
///
/// let creds = Credentials::new("api-key", "api-secret");
/// assert_eq!(creds.api_key(), "api-key");
/// ```
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Returns the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the `Authorization: Basic` value for the token endpoint.
    ///
    /// The value is marked sensitive so it is left out of header debug output.
    pub(crate) fn basic_auth_header(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        let encoded = STANDARD.encode(format!("{}:{}", self.api_key, self.api_secret));
        let mut value = HeaderValue::from_str(&format!("Basic {}", encoded))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

// Hide the secret in Debug output
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .finish()
    }
}
