use serde::Serialize;

use crate::adapter::Scheme;

/// Mechanism that authenticated a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    Basic,
    Digest,
    OAuth2,
}

impl From<Scheme> for AuthMethod {
    fn from(scheme: Scheme) -> Self {
        match scheme {
            Scheme::Basic => AuthMethod::Basic,
            Scheme::Digest => AuthMethod::Digest,
        }
    }
}

impl AuthMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthMethod::Basic => "basic",
            AuthMethod::Digest => "digest",
            AuthMethod::OAuth2 => "oauth2",
        }
    }
}

/// Client identity resulting from request authentication.
///
/// An identity with no `method` is a guest.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ClientIdentity {
    pub id: Option<String>,
    pub username: Option<String>,
    pub method: Option<AuthMethod>,
}

impl ClientIdentity {
    pub fn is_guest(&self) -> bool {
        self.method.is_none()
    }
}
