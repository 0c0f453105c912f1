//! Authentication types and session management.
//!
//! This module provides the application-only OAuth2 primitives.
//! All authenticated operations go through a [`Session`] object.

mod credentials;
mod session;
mod tokens;

pub use credentials::Credentials;
pub use session::Session;
pub use tokens::BearerToken;
