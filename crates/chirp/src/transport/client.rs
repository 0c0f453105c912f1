//! HTTP transport implementation.

use std::any::type_name;
use std::sync::Arc;

use bytes::Bytes;
use reqwest::{Request, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace};

use crate::error::{DecodeError, Error, TransportError};
use crate::types::ApiUrl;

use super::endpoints::ErrorBody;
use super::request::ApiRequest;
use super::sender::HttpSender;

/// A hook that may adjust an outgoing request (headers, credentials) before
/// it is sent.
pub type RequestDecorator<'a> = dyn Fn(&mut Request) + Send + Sync + 'a;

/// Stateless HTTP client for the API.
///
/// Builds requests against the base URL, hands them to the injected
/// [`HttpSender`] and turns non-2xx responses into [`Error::Api`].
#[derive(Clone)]
pub struct Transport {
    sender: Arc<dyn HttpSender>,
    base_url: ApiUrl,
}

impl Transport {
    /// Create a new transport for the given base URL.
    pub fn new(base_url: ApiUrl, sender: Arc<dyn HttpSender>) -> Self {
        Self { sender, base_url }
    }

    /// Returns the base URL this transport is configured for.
    pub fn base_url(&self) -> &ApiUrl {
        &self.base_url
    }

    /// Send a request and decode the JSON response into `R`.
    #[instrument(skip(self, request, decorator), fields(method = %request.method(), path = %request.path()))]
    pub async fn send<R>(
        &self,
        request: &ApiRequest,
        decorator: Option<&RequestDecorator<'_>>,
    ) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let body = self.dispatch(request, decorator).await?;
        decode_json(&body)
    }

    /// Send a request whose response body is not needed.
    #[instrument(skip(self, request, decorator), fields(method = %request.method(), path = %request.path()))]
    pub async fn send_no_response(
        &self,
        request: &ApiRequest,
        decorator: Option<&RequestDecorator<'_>>,
    ) -> Result<(), Error> {
        self.dispatch(request, decorator).await.map(|_| ())
    }

    /// Send a request and return the raw body of a successful response.
    ///
    /// A status outside `[200, 400)` yields the decoded error set. When the
    /// error body itself cannot be decoded, the decode failure is returned
    /// instead of the status.
    pub(crate) async fn dispatch(
        &self,
        request: &ApiRequest,
        decorator: Option<&RequestDecorator<'_>>,
    ) -> Result<Bytes, Error> {
        let mut req = self.build(request)?;

        if let Some(decorate) = decorator {
            decorate(&mut req);
        }

        debug!(url = %req.url(), "HTTP request");

        let transport_error = |source: reqwest::Error| Error::Transport {
            method: request.method().to_string(),
            path: request.path().to_string(),
            source: TransportError::from(source),
        };

        let response = self.sender.send(req).await.map_err(transport_error)?;
        let status = response.status();
        trace!(status = %status, "HTTP response");

        let body = response.bytes().await.map_err(transport_error)?;

        if status.as_u16() < 200 || status.as_u16() >= 400 {
            let error_body: ErrorBody = decode_json(&body)?;
            debug!(status = %status, errors = %error_body.errors, "API error");
            return Err(Error::Api(error_body.errors));
        }

        Ok(body)
    }

    fn build(&self, request: &ApiRequest) -> Result<Request, Error> {
        let mut url = Url::parse(&self.base_url.endpoint(request.path())).map_err(|e| {
            Error::RequestBuild {
                method: request.method().to_string(),
                path: request.path().to_string(),
                reason: e.to_string(),
            }
        })?;

        if !request.query().is_empty() {
            url.query_pairs_mut().extend_pairs(request.query());
        }

        let mut req = Request::new(request.method().clone(), url);
        if let Some(body) = request.body() {
            *req.body_mut() = Some(body.clone().into());
        }

        Ok(req)
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Decode a JSON body into `R`.
pub(crate) fn decode_json<R: DeserializeOwned>(body: &[u8]) -> Result<R, Error> {
    serde_json::from_slice(body).map_err(|source| {
        DecodeError::Json {
            target: type_name::<R>(),
            source,
        }
        .into()
    })
}
