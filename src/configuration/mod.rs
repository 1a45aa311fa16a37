use serde::Deserialize;
use std::fs;
use std::path::Path;

mod error;

use crate::adapter;
pub use error::Error;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub mvc_auth: Option<MvcAuthConfig>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MvcAuthConfig {
    #[serde(default)]
    pub authentication: Option<AuthenticationConfig>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AuthenticationConfig {
    #[serde(default)]
    pub http: Option<adapter::Config>,
}

impl Configuration {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let config_str = fs::read_to_string(path)?;
        Self::load_from_str(&config_str)
    }

    pub fn load_from_str(slice: &str) -> Result<Self, Error> {
        let config: Configuration = toml::from_str(slice)?;
        Ok(config)
    }

    /// The HTTP authentication section, if every enclosing section is present.
    pub fn http_authentication(&self) -> Option<&adapter::Config> {
        self.mvc_auth
            .as_ref()?
            .authentication
            .as_ref()?
            .http
            .as_ref()
    }
}
