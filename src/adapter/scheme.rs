use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// HTTP authentication schemes an adapter can accept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Basic,
    Digest,
}

impl Scheme {
    pub const SUPPORTED: [Scheme; 2] = [Scheme::Basic, Scheme::Digest];

    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Basic => "basic",
            Scheme::Digest => "digest",
        }
    }

    /// Matches the scheme name of an `Authorization` header, which is case-insensitive.
    pub fn from_header_name(name: &str) -> Option<Self> {
        Self::SUPPORTED
            .into_iter()
            .find(|scheme| scheme.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Scheme::Basic),
            "digest" => Ok(Scheme::Digest),
            _ => Err(Error::Configuration(format!(
                "Unsupported authentication scheme: '{s}'"
            ))),
        }
    }
}
