//! Endpoint paths and request/response bodies.

use serde::Deserialize;

use crate::error::ApiErrors;

/// OAuth2 token endpoint (client-credentials grant).
pub const OAUTH2_TOKEN: &str = "/oauth2/token";

/// statuses/user_timeline
pub const USER_TIMELINE: &str = "/1.1/statuses/user_timeline.json";

/// Form body of the client-credentials grant.
pub const GRANT_BODY: &str = "grant_type=client_credentials";

/// Content type of the client-credentials grant.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Response from the token endpoint.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
}

/// Error body returned with any non-2xx status.
///
/// A body without an `errors` array decodes to an empty set.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub errors: ApiErrors,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_response_parses() {
        let body = r#"{"token_type":"bearer","access_token":"AAAA%2FAAA"}"#;
        let response: TokenResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.access_token, "AAAA%2FAAA");
        assert_eq!(response.token_type, "bearer");
    }

    #[test]
    fn error_body_parses() {
        let body = r#"{"errors":[{"code":89,"message":"Invalid or expired token."}]}"#;
        let parsed: ErrorBody = serde_json::from_str(body).unwrap();
        assert!(parsed.errors.is_invalid_token());
    }

    #[test]
    fn error_body_without_errors_is_empty() {
        let parsed: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(parsed.errors.is_empty());
    }
}
