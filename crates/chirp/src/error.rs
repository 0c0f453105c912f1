//! Error types for the chirp library.
//!
//! This module provides a unified error type with explicit variants for
//! request construction, transport, decoding, platform and authentication
//! errors. The platform's structured error set ([`ApiErrors`]) is its own
//! variant so callers can match on it directly.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error code the platform returns when a bearer token is invalid or expired.
pub const INVALID_OR_EXPIRED_TOKEN: i64 = 89;

/// The unified error type for chirp operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The request could not be constructed (malformed URL).
    #[error("creating {method} request to {path} failed: {reason}")]
    RequestBuild {
        method: String,
        path: String,
        reason: String,
    },

    /// The HTTP sender failed (DNS, TLS, connection, timeout).
    #[error("sending {method} request to {path} failed: {source}")]
    Transport {
        method: String,
        path: String,
        #[source]
        source: TransportError,
    },

    /// A response body did not have the expected JSON shape.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Structured errors returned by the platform.
    #[error("API error: {0}")]
    Api(#[from] ApiErrors),

    /// The credentials grant failed, either initially or on refresh.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// The default HTTP sender could not be configured.
    #[error("configuring HTTP sender failed: {reason}")]
    Setup { reason: String },

    /// A configured base URL was rejected.
    #[error("invalid base URL '{value}': {reason}")]
    InvalidBaseUrl { value: String, reason: String },

    /// An error annotated with the logical operation it occurred in.
    #[error("{operation} failed: {source}")]
    Context {
        operation: Operation,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap this error with the operation it occurred in.
    pub(crate) fn context(self, operation: Operation) -> Self {
        Error::Context {
            operation,
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, looking through context and
    /// authentication wrappers.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root_cause(),
            Error::Auth(err) => err.source.root_cause(),
            other => other,
        }
    }

    /// Returns the platform error set behind any context layers.
    ///
    /// Errors returned by the token endpoint during a failed grant are not
    /// reported here; they sit behind [`Error::Auth`].
    pub fn api_errors(&self) -> Option<&ApiErrors> {
        match self {
            Error::Api(errors) => Some(errors),
            Error::Context { source, .. } => source.api_errors(),
            _ => None,
        }
    }

    /// Check if the platform rejected the bearer token.
    pub fn is_invalid_token(&self) -> bool {
        self.api_errors().is_some_and(ApiErrors::is_invalid_token)
    }

    /// Check if this is a credentials grant failure.
    pub fn is_auth(&self) -> bool {
        match self {
            Error::Auth(_) => true,
            Error::Context { source, .. } => source.is_auth(),
            _ => false,
        }
    }
}

/// Logical operations used to annotate errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Exchanging the API key and secret for a bearer token.
    Grant,
    /// Sending a request carrying the bearer token.
    AuthenticatedSend,
    /// Fetching a user timeline.
    UserTimeline,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Grant => write!(f, "requesting bearer token"),
            Operation::AuthenticatedSend => write!(f, "sending authenticated request"),
            Operation::UserTimeline => write!(f, "fetching user timeline"),
        }
    }
}

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out: {message}")]
    Timeout { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout {
                message: err.to_string(),
            }
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

/// Response decoding errors.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body was not valid JSON for the expected type.
    #[error("unmarshaling {target} failed: {source}")]
    Json {
        target: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The token endpoint returned a token that cannot be sent in a header.
    #[error("access token is not a valid header value")]
    InvalidToken,
}

/// A single entry of the platform's error body.
///
/// Missing fields decode to zero and the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// All errors returned by one failed call, in the order the platform sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiErrors(Vec<ApiError>);

impl ApiErrors {
    pub fn new(errors: Vec<ApiError>) -> Self {
        Self(errors)
    }

    pub fn as_slice(&self) -> &[ApiError] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ApiError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check if any entry carries the given code.
    pub fn contains_code(&self, code: i64) -> bool {
        self.0.iter().any(|e| e.code == code)
    }

    /// Check if any entry reports an invalid or expired token.
    pub fn is_invalid_token(&self) -> bool {
        self.contains_code(INVALID_OR_EXPIRED_TOKEN)
    }
}

impl fmt::Display for ApiErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " | ")?;
            }
            write!(f, "code: {} - message: {}", e.code, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiErrors {}

impl<'a> IntoIterator for &'a ApiErrors {
    type Item = &'a ApiError;
    type IntoIter = std::slice::Iter<'a, ApiError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Which credentials grant failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStage {
    /// The first grant of the session.
    Initial,
    /// The grant issued after the platform rejected the cached token.
    Refresh,
}

impl fmt::Display for AuthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthStage::Initial => write!(f, "getting bearer token"),
            AuthStage::Refresh => write!(f, "refreshing bearer token"),
        }
    }
}

/// Credentials grant failure.
#[derive(Debug, Error)]
#[error("{stage} failed: {source}")]
pub struct AuthError {
    pub stage: AuthStage,
    #[source]
    pub source: Box<Error>,
}

impl AuthError {
    pub(crate) fn new(stage: AuthStage, source: Error) -> Self {
        Self {
            stage,
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn errors(codes: &[(i64, &str)]) -> ApiErrors {
        ApiErrors::new(
            codes
                .iter()
                .map(|(code, message)| ApiError {
                    code: *code,
                    message: message.to_string(),
                })
                .collect(),
        )
    }

    #[test]
    fn api_errors_join_in_order() {
        let errs = errors(&[(17, "No user matches"), (89, "Invalid or expired token")]);
        assert_eq!(
            errs.to_string(),
            "code: 17 - message: No user matches | code: 89 - message: Invalid or expired token"
        );
    }

    #[test]
    fn api_errors_detect_invalid_token_anywhere() {
        assert!(errors(&[(17, "a"), (89, "b")]).is_invalid_token());
        assert!(!errors(&[(17, "a"), (88, "rate limited")]).is_invalid_token());
        assert!(!ApiErrors::default().is_invalid_token());
    }

    #[test]
    fn api_errors_parse_from_body() {
        let body: serde_json::Value = serde_json::json!([
            {"code": 89, "message": "Invalid or expired token."}
        ]);
        let errs: ApiErrors = serde_json::from_value(body).unwrap();
        assert_eq!(errs.len(), 1);
        assert_eq!(errs.as_slice()[0].message, "Invalid or expired token.");
    }

    #[test]
    fn api_error_fields_are_optional() {
        let errs: ApiErrors = serde_json::from_value(serde_json::json!([
            {"code": 89},
            {"message": "no code"}
        ]))
        .unwrap();

        assert!(errs.is_invalid_token());
        assert_eq!(errs.as_slice()[0].message, "");
        assert_eq!(errs.as_slice()[1].code, 0);
        assert_eq!(errs.as_slice()[1].message, "no code");
    }

    #[test]
    fn context_layers_keep_api_errors_reachable() {
        let err = Error::Api(errors(&[(89, "expired")]))
            .context(Operation::AuthenticatedSend)
            .context(Operation::UserTimeline);

        assert!(err.is_invalid_token());
        assert!(matches!(err.root_cause(), Error::Api(_)));
        assert_eq!(
            err.to_string(),
            "fetching user timeline failed: sending authenticated request failed: API error: code: 89 - message: expired"
        );
    }

    #[test]
    fn auth_errors_hide_grant_api_errors() {
        let grant = Error::Api(errors(&[(99, "Unable to verify your credentials")]))
            .context(Operation::Grant);
        let err = Error::from(AuthError::new(AuthStage::Initial, grant))
            .context(Operation::UserTimeline);

        assert!(err.is_auth());
        assert!(err.api_errors().is_none());
        assert!(matches!(err.root_cause(), Error::Api(_)));
    }

    #[test]
    fn error_sources_are_chained() {
        use std::error::Error as _;

        let err = Error::Api(errors(&[(17, "x")])).context(Operation::Grant);
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "API error: code: 17 - message: x");
    }
}
