use async_trait::async_trait;
use hyper::http::request::Parts;

use crate::error::Error;

/// A preconfigured OAuth2 resource server provided by the host application.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OAuth2Server: Send + Sync {
    /// Verifies the bearer token carried by the request.
    ///
    /// Returns the client or user id the token was issued to, or `None` when
    /// the token is invalid or expired.
    async fn verify_resource_request(&self, parts: &Parts) -> Result<Option<String>, Error>;
}
