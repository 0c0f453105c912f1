//! Session management for authenticated API calls.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::Request;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::{AuthError, AuthStage, Error, Operation};
use crate::timeline::{Tweet, UserTimelineOptions};
use crate::transport::endpoints::{
    FORM_CONTENT_TYPE, GRANT_BODY, OAUTH2_TOKEN, TokenResponse, USER_TIMELINE,
};
use crate::transport::{
    ApiRequest, HttpSender, RequestDecorator, ReqwestSender, Transport, decode_json,
};
use crate::types::ApiUrl;

use super::credentials::Credentials;
use super::tokens::BearerToken;

/// A session holding application-only credentials and the current bearer token.
///
/// The token is fetched lazily on the first authenticated call and cached.
/// When the platform reports it invalid or expired (error code 89) the
/// session requests a new one and retries the call once.
///
/// # Thread Safety
///
/// Sessions are cheap to clone (they use internal `Arc`) and are safe to
/// share across tasks. Fetching and replacing the token happens under a lock,
/// so concurrent calls never issue redundant grants.
///
/// # Example
///
/// ```no_run
/// use chirp::{Config, Session, UserTimelineOptions};
///
/// # async fn example() -> Result<(), chirp::Error> {
/// let session = Session::new(Config::new("api-key", "api-secret"))?;
///
/// let tweets = session
///     .user_timeline(&UserTimelineOptions::for_screen_name("twitterapi"))
///     .await?;
///
/// for tweet in tweets {
///     println!("{} {}", tweet.created_at, tweet.text);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    credentials: Credentials,
    transport: Transport,
    token: Mutex<Option<BearerToken>>,
}

impl Session {
    /// Create a session that sends through the default reqwest sender.
    ///
    /// No network call is made until the first request.
    ///
    /// # Errors
    ///
    /// Returns an error if the sender cannot be configured from
    /// `config.sender`.
    pub fn new(config: Config) -> Result<Self, Error> {
        let sender = ReqwestSender::new(&config.sender)?;
        Ok(Self::with_sender(config, Arc::new(sender)))
    }

    /// Create a session that sends through the given sender.
    pub fn with_sender(config: Config, sender: Arc<dyn HttpSender>) -> Self {
        let credentials = Credentials::new(config.api_key, config.api_secret);
        let transport = Transport::new(config.base_url, sender);

        Self {
            inner: Arc::new(SessionInner {
                credentials,
                transport,
                token: Mutex::new(None),
            }),
        }
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &ApiUrl {
        self.inner.transport.base_url()
    }

    /// Returns the credentials of this session.
    pub fn credentials(&self) -> &Credentials {
        &self.inner.credentials
    }

    /// Returns whether a bearer token is cached.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.token.lock().await.is_some()
    }

    /// Returns the cached bearer token, requesting one if none is cached.
    ///
    /// Authenticated calls do this implicitly; calling it up front surfaces
    /// credential problems before the first real request.
    #[instrument(skip(self))]
    pub async fn authenticate(&self) -> Result<BearerToken, Error> {
        self.current_token().await
    }

    /// Export the cached bearer token, if any.
    ///
    /// # Security
    ///
    /// Handle the returned token securely. It grants application-only access.
    pub async fn bearer_token(&self) -> Option<BearerToken> {
        self.inner.token.lock().await.clone()
    }

    /// Request a new bearer token and replace the cached one.
    ///
    /// On failure the cached token is dropped, so the next call starts with
    /// a fresh grant.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), Error> {
        info!("Refreshing bearer token");

        let mut slot = self.inner.token.lock().await;
        *slot = None;
        let token = self
            .request_token()
            .await
            .map_err(|e| AuthError::new(AuthStage::Refresh, e))?;
        *slot = Some(token);

        debug!("Bearer token refreshed");
        Ok(())
    }

    /// Send a request carrying the bearer token and decode the JSON response.
    ///
    /// The caller's decorator runs first; the `Authorization` header it sets,
    /// if any, is overwritten with the bearer token.
    ///
    /// # Errors
    ///
    /// - [`Error::Auth`] if no token could be obtained; nothing is sent.
    /// - The transport error, wrapped with the authenticated-send context,
    ///   for any other failure. After a token refresh the retry's error is
    ///   the one returned.
    #[instrument(skip(self, request, decorator), fields(method = %request.method(), path = %request.path()))]
    pub async fn send_authenticated<R>(
        &self,
        request: &ApiRequest,
        decorator: Option<&RequestDecorator<'_>>,
    ) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let body = self.dispatch_authenticated(request, decorator).await?;
        decode_json(&body).map_err(|e| e.context(Operation::AuthenticatedSend))
    }

    /// Like [`send_authenticated`](Self::send_authenticated) for responses
    /// whose body is not needed.
    #[instrument(skip(self, request, decorator), fields(method = %request.method(), path = %request.path()))]
    pub async fn send_authenticated_no_response(
        &self,
        request: &ApiRequest,
        decorator: Option<&RequestDecorator<'_>>,
    ) -> Result<(), Error> {
        self.dispatch_authenticated(request, decorator)
            .await
            .map(|_| ())
    }

    // ========================================================================
    // Timeline Operations
    // ========================================================================

    /// Fetch the most recent statuses of a user.
    ///
    /// Only the options that are set are sent.
    #[instrument(skip(self))]
    pub async fn user_timeline(&self, options: &UserTimelineOptions) -> Result<Vec<Tweet>, Error> {
        debug!("Fetching user timeline");

        let request = ApiRequest::get(USER_TIMELINE).with_query(options.query_pairs());

        self.send_authenticated(&request, None)
            .await
            .map_err(|e| e.context(Operation::UserTimeline))
    }

    // ========================================================================
    // Token handling
    // ========================================================================

    async fn dispatch_authenticated(
        &self,
        request: &ApiRequest,
        decorator: Option<&RequestDecorator<'_>>,
    ) -> Result<Bytes, Error> {
        let token = self.current_token().await?;

        let err = match self.dispatch_with_token(request, decorator, &token).await {
            Ok(body) => return Ok(body),
            Err(err) => err,
        };

        if !matches!(&err, Error::Api(errors) if errors.is_invalid_token()) {
            return Err(err.context(Operation::AuthenticatedSend));
        }

        warn!(error = %err, "Bearer token rejected, requesting a new one");
        let token = self.replace_rejected_token(&token).await?;

        self.dispatch_with_token(request, decorator, &token)
            .await
            .map_err(|e| e.context(Operation::AuthenticatedSend))
    }

    async fn dispatch_with_token(
        &self,
        request: &ApiRequest,
        decorator: Option<&RequestDecorator<'_>>,
        token: &BearerToken,
    ) -> Result<Bytes, Error> {
        let authorization = token.header_value().clone();
        let authenticate: &RequestDecorator<'_> = &move |req: &mut Request| {
            if let Some(decorate) = decorator {
                decorate(req);
            }
            req.headers_mut()
                .insert(AUTHORIZATION, authorization.clone());
        };

        self.inner
            .transport
            .dispatch(request, Some(authenticate))
            .await
    }

    /// Returns the cached token, requesting one if none is cached.
    async fn current_token(&self) -> Result<BearerToken, Error> {
        let mut slot = self.inner.token.lock().await;

        if let Some(token) = slot.as_ref() {
            return Ok(token.clone());
        }

        debug!("No bearer token cached, requesting one");
        let token = self
            .request_token()
            .await
            .map_err(|e| AuthError::new(AuthStage::Initial, e))?;
        *slot = Some(token.clone());
        Ok(token)
    }

    /// Replace a token the platform rejected.
    ///
    /// If another call already replaced it, the replacement is returned
    /// without a new grant.
    async fn replace_rejected_token(&self, rejected: &BearerToken) -> Result<BearerToken, Error> {
        let mut slot = self.inner.token.lock().await;

        if let Some(current) = slot.as_ref()
            && current != rejected
        {
            debug!("Bearer token already replaced");
            return Ok(current.clone());
        }

        *slot = None;
        let token = self
            .request_token()
            .await
            .map_err(|e| AuthError::new(AuthStage::Refresh, e))?;
        *slot = Some(token.clone());
        Ok(token)
    }

    /// Exchange the API key and secret for a bearer token.
    async fn request_token(&self) -> Result<BearerToken, Error> {
        self.grant()
            .await
            .map_err(|e| e.context(Operation::Grant))
    }

    async fn grant(&self) -> Result<BearerToken, Error> {
        let basic = self
            .inner
            .credentials
            .basic_auth_header()
            .map_err(|e| Error::RequestBuild {
                method: "POST".to_string(),
                path: OAUTH2_TOKEN.to_string(),
                reason: e.to_string(),
            })?;

        let request = ApiRequest::post(OAUTH2_TOKEN).with_body(GRANT_BODY);
        let decorate: &RequestDecorator<'_> = &move |req: &mut Request| {
            let headers = req.headers_mut();
            headers.insert(AUTHORIZATION, basic.clone());
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        };

        let response: TokenResponse = self.inner.transport.send(&request, Some(decorate)).await?;

        debug!(token_type = %response.token_type, "Bearer token obtained");
        Ok(BearerToken::new(response.access_token)?)
    }
}

// Custom Debug impl that hides sensitive data
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("credentials", &self.inner.credentials)
            .field("base_url", self.inner.transport.base_url())
            .field("token", &"[REDACTED]")
            .finish()
    }
}
