use mvc_auth::{configuration, error};
use std::fmt;

#[derive(Debug)]
pub enum Error {
    Configuration(configuration::Error),
    Authentication(error::Error),
    Output(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Configuration(err) => {
                write!(f, "Configuration error: ")?;
                write!(f, "{err}")
            }
            Error::Authentication(err) => write!(f, "{err}"),
            Error::Output(err) => write!(f, "Output error: {err}"),
        }
    }
}

impl From<configuration::Error> for Error {
    fn from(err: configuration::Error) -> Self {
        Error::Configuration(err)
    }
}

impl From<error::Error> for Error {
    fn from(err: error::Error) -> Self {
        Error::Authentication(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Output(err)
    }
}
