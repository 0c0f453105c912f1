//! Client configuration.
//!
//! [`Config`] is built by the caller and handed to [`Session::new`]. It derives
//! `Deserialize` so front ends can load it from a file.
//!
//! [`Session::new`]: crate::Session::new

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::ApiUrl;

/// Configuration for a [`Session`](crate::Session).
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_key: String,
    pub api_secret: String,
    #[serde(default)]
    pub base_url: ApiUrl,
    #[serde(default)]
    pub sender: SenderOptions,
}

impl Config {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            base_url: ApiUrl::default(),
            sender: SenderOptions::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: ApiUrl) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_sender(mut self, sender: SenderOptions) -> Self {
        self.sender = sender;
        self
    }
}

// Hide the secret in Debug output
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("sender", &self.sender)
            .finish()
    }
}

/// Options for the default HTTP sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderOptions {
    /// Whole-request timeout in milliseconds. No timeout when unset.
    pub timeout_ms: Option<u64>,
    /// How many times a failed send or a 5xx response is retried.
    pub retry_max_attempts: u32,
    /// Pause between retries in milliseconds.
    pub retry_sleep_ms: u64,
    /// User agent header. Defaults to `chirp/<version>`.
    pub user_agent: Option<String>,
}

impl SenderOptions {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn retry_sleep(&self) -> Duration {
        Duration::from_millis(self.retry_sleep_ms)
    }
}

impl Default for SenderOptions {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            retry_max_attempts: 0,
            retry_sleep_ms: 1000,
            user_agent: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_hides_secret_in_debug() {
        let config = Config::new("key123", "secret456");
        let debug = format!("{:?}", config);
        assert!(debug.contains("key123"));
        assert!(!debug.contains("secret456"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config = serde_json::from_str(r#"{"api_key":"k","api_secret":"s"}"#).unwrap();
        assert_eq!(config.base_url, ApiUrl::default());
        assert_eq!(config.sender, SenderOptions::default());
    }

    #[test]
    fn partial_sender_options() {
        let config: Config = serde_json::from_str(
            r#"{"api_key":"k","api_secret":"s","sender":{"timeout_ms":2500,"retry_max_attempts":3}}"#,
        )
        .unwrap();
        assert_eq!(config.sender.timeout(), Some(Duration::from_millis(2500)));
        assert_eq!(config.sender.retry_max_attempts, 3);
        assert_eq!(config.sender.retry_sleep(), Duration::from_secs(1));
    }

    #[test]
    fn rejects_insecure_base_url() {
        let result = serde_json::from_str::<Config>(
            r#"{"api_key":"k","api_secret":"s","base_url":"http://api.twitter.com"}"#,
        );
        assert!(result.is_err());
    }
}
