//! API base URL type.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::{Host, Url};

use crate::error::Error;

/// The platform's API origin.
pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com";

/// The origin (plus optional path prefix) every endpoint path is joined onto.
///
/// Plain HTTP is accepted only for loopback hosts, so tests can point a
/// session at a local mock server.
///
/// ```
/// use chirp::ApiUrl;
///
/// let api = ApiUrl::default();
/// assert_eq!(api.endpoint("/oauth2/token"), "https://api.twitter.com/oauth2/token");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiUrl(Url);

impl ApiUrl {
    /// Parse and validate a base URL.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let raw = s.as_ref();
        let reject = |reason: String| Error::InvalidBaseUrl {
            value: raw.to_string(),
            reason,
        };

        let url = Url::parse(raw).map_err(|e| reject(e.to_string()))?;
        check(&url).map_err(|reason| reject(reason.to_string()))?;

        Ok(Self(url))
    }

    /// Returns the full URL for an endpoint path such as `/oauth2/token`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.0.as_str().trim_end_matches('/'), path)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn check(url: &Url) -> Result<(), &'static str> {
    let host = url.host().ok_or("must have a host")?;

    match url.scheme() {
        "https" => {}
        "http" if is_loopback(&host) => {}
        _ => return Err("must use HTTPS (HTTP allowed only for loopback hosts)"),
    }

    if url.query().is_some() {
        return Err("must not carry a query string");
    }

    Ok(())
}

fn is_loopback(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(name) => *name == "localhost",
        Host::Ipv4(ip) => ip.is_loopback(),
        Host::Ipv6(ip) => ip.is_loopback(),
    }
}

impl Default for ApiUrl {
    fn default() -> Self {
        Self(Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"))
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl TryFrom<String> for ApiUrl {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ApiUrl> for String {
    fn from(value: ApiUrl) -> Self {
        value.0.into()
    }
}
