use std::fmt;

#[derive(Debug, PartialEq)]
pub enum Error {
    // raised while building an adapter, never while authenticating
    Configuration(String),
    // raised while authenticating a request
    Unauthorized(String),
    Resolver(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Configuration(err) => write!(f, "Configuration error: {err}"),
            Error::Unauthorized(err) => write!(f, "Unauthorized: {err}"),
            Error::Resolver(err) => write!(f, "Resolver error: {err}"),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}
