//! Transport layer.
//!
//! This module provides the stateless HTTP client that talks to the API and
//! the [`HttpSender`] seam it sends through.

mod client;
pub(crate) mod endpoints;
mod request;
mod sender;

pub use client::{RequestDecorator, Transport};
pub(crate) use client::decode_json;
pub use request::ApiRequest;
pub use sender::{HttpSender, ReqwestSender};
