//! Bearer token type.

use std::fmt;

use reqwest::header::HeaderValue;

use crate::error::DecodeError;

/// An application-only bearer token.
///
/// Bearer tokens are obtained from the client-credentials grant and sent as
/// `Authorization: Bearer <token>`. A token may be rejected by the platform at
/// any time, after which the session requests a new one.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
    token: String,
    header: HeaderValue,
}

impl BearerToken {
    /// Create a bearer token, rejecting values that cannot be sent in a header.
    pub(crate) fn new(token: impl Into<String>) -> Result<Self, DecodeError> {
        let token = token.into();
        if token.is_empty() {
            return Err(DecodeError::InvalidToken);
        }

        let mut header = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| DecodeError::InvalidToken)?;
        header.set_sensitive(true);

        Ok(Self { token, header })
    }

    /// Returns the token value.
    ///
    /// # Security
    ///
    /// Never log or display this value.
    pub fn as_str(&self) -> &str {
        &self.token
    }

    /// Returns the complete `Authorization` header value.
    pub(crate) fn header_value(&self) -> &HeaderValue {
        &self.header
    }
}

// Hide token value in Debug output
impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BearerToken").field(&"[REDACTED]").finish()
    }
}
