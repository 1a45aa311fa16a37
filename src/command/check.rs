use std::sync::Arc;

use argh::FromArgs;
use mvc_auth::adapter::Scheme;
use mvc_auth::configuration::Configuration;
use mvc_auth::listener::{select_authentication_mechanism, AuthenticationListener, Services};
use mvc_auth::resolver::FileResolverFactory;
use serde::Serialize;
use tracing::info;

use crate::command;

#[derive(FromArgs, PartialEq, Debug)]
#[argh(
    subcommand,
    name = "check",
    description = "Validate the configuration and report the authentication mechanisms"
)]
pub struct Options {}

/// What the listener selector wired, as printed by `check`.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct Summary {
    pub http_adapter: bool,
    pub accept_schemes: Vec<Scheme>,
    pub realm: Option<String>,
    pub basic_resolver: bool,
    pub digest_resolver: bool,
    pub oauth2_server: bool,
}

impl From<&AuthenticationListener> for Summary {
    fn from(listener: &AuthenticationListener) -> Self {
        let mut summary = Summary {
            oauth2_server: listener.oauth2_server().is_some(),
            ..Summary::default()
        };

        if let Some(adapter) = listener.http_adapter() {
            summary.http_adapter = true;
            summary.accept_schemes = adapter.schemes().to_vec();
            summary.realm = Some(adapter.realm().to_string());
            summary.basic_resolver = adapter.basic_resolver().is_some();
            summary.digest_resolver = adapter.digest_resolver().is_some();
        }

        summary
    }
}

pub struct Command {
    services: Services,
}

impl Command {
    pub fn new(config: Configuration) -> Self {
        let services = Services::new(Arc::new(FileResolverFactory)).with_config(config);
        Self { services }
    }

    pub fn summarize(&self) -> Result<Summary, command::Error> {
        let listener = select_authentication_mechanism(&self.services)?;
        Ok(Summary::from(&listener))
    }

    pub fn run(&self) -> Result<(), command::Error> {
        let summary = self.summarize()?;
        info!(http_adapter = summary.http_adapter, "Configuration is valid");

        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}
