//! HTTP sender abstraction and the default reqwest-backed sender.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Request, Response};
use tracing::warn;

use crate::config::SenderOptions;
use crate::error::Error;

/// Sends fully built requests.
///
/// Connection pooling, TLS and timeouts are the implementation's concern.
#[async_trait]
pub trait HttpSender: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response, reqwest::Error>;
}

#[async_trait]
impl HttpSender for reqwest::Client {
    async fn send(&self, request: Request) -> Result<Response, reqwest::Error> {
        self.execute(request).await
    }
}

/// The default sender: a `reqwest::Client` plus a simple retry policy.
///
/// Failed sends and 5xx responses are retried up to `retry_max_attempts`
/// times with a fixed pause in between. Requests whose body cannot be cloned
/// are sent once.
#[derive(Debug, Clone)]
pub struct ReqwestSender {
    client: reqwest::Client,
    retry_max_attempts: u32,
    retry_sleep: Duration,
}

impl ReqwestSender {
    /// Build a sender from the given options.
    pub fn new(options: &SenderOptions) -> Result<Self, Error> {
        let user_agent = options
            .user_agent
            .clone()
            .unwrap_or_else(|| concat!("chirp/", env!("CARGO_PKG_VERSION")).to_string());

        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = options.timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| Error::Setup {
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            retry_max_attempts: options.retry_max_attempts,
            retry_sleep: options.retry_sleep(),
        })
    }
}

#[async_trait]
impl HttpSender for ReqwestSender {
    async fn send(&self, request: Request) -> Result<Response, reqwest::Error> {
        let mut request = request;
        let mut attempt = 0;

        loop {
            let next = if attempt < self.retry_max_attempts {
                request.try_clone()
            } else {
                None
            };

            let result = self.client.execute(request).await;

            let Some(next) = next else {
                return result;
            };

            let retry = match &result {
                Ok(response) => response.status().is_server_error(),
                Err(_) => true,
            };
            if !retry {
                return result;
            }

            match &result {
                Ok(response) => warn!(
                    status = %response.status(),
                    url = %next.url(),
                    attempt = attempt + 1,
                    "Server error, retrying"
                ),
                Err(e) => warn!(
                    error = %e,
                    url = %next.url(),
                    attempt = attempt + 1,
                    "Send failed, retrying"
                ),
            }

            drop(result);
            tokio::time::sleep(self.retry_sleep).await;
            request = next;
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let sender = ReqwestSender::new(&SenderOptions::default()).unwrap();
        assert_eq!(sender.retry_max_attempts, 0);
        assert_eq!(sender.retry_sleep, Duration::from_secs(1));
    }

    #[test]
    fn rejects_invalid_user_agent() {
        let options = SenderOptions {
            user_agent: Some("bad\nagent".to_string()),
            ..Default::default()
        };
        let err = ReqwestSender::new(&options).unwrap_err();
        assert!(matches!(err, Error::Setup { .. }));
    }
}
