
mod http_adapter;
mod scheme;

use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::Error;
use crate::resolver::ResolverFactory;
pub use http_adapter::{AdapterOptions, HttpAdapter};
pub use scheme::Scheme;

static ACCEPT_SCHEMES_REQUIRED: &str =
    "\"accept_schemes\" is required when configuring an HTTP authentication adapter";
static REALM_REQUIRED: &str =
    "\"realm\" is required when configuring an HTTP authentication adapter";
static DIGEST_OPTIONS_REQUIRED: &str = "Both \"digest_domains\" and \"nonce_timeout\" are required when configuring an HTTP digest authentication adapter";

/// Value of the `accept_schemes` key.
///
/// Anything that is not a list is kept as a scalar so the factory can reject it.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AcceptSchemes {
    Sequence(Vec<String>),
    Scalar(toml::Value),
}

/// The `[mvc_auth.authentication.http]` configuration section.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Config {
    pub accept_schemes: Option<AcceptSchemes>,
    pub realm: Option<String>,
    pub digest_domains: Option<String>,
    pub nonce_timeout: Option<u64>,
    pub htpasswd: Option<PathBuf>,
    pub htdigest: Option<PathBuf>,
}

/// Resolver attachment applied to a freshly constructed adapter.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolverStep {
    AttachBasic(PathBuf),
    AttachDigest(PathBuf),
}

impl ResolverStep {
    fn apply(&self, adapter: &mut HttpAdapter, factory: &dyn ResolverFactory) -> Result<(), Error> {
        match self {
            ResolverStep::AttachBasic(path) => {
                debug!("Attaching basic resolver from {}", path.display());
                adapter.set_basic_resolver(factory.basic(path)?);
            }
            ResolverStep::AttachDigest(path) => {
                debug!("Attaching digest resolver from {}", path.display());
                adapter.set_digest_resolver(factory.digest(path)?);
            }
        }
        Ok(())
    }
}

/// Lists the resolver attachments a configuration asks for, in application order.
pub fn resolver_steps(schemes: &[String], config: &Config) -> Vec<ResolverStep> {
    let accepts = |name: &str| schemes.iter().any(|scheme| scheme == name);

    let mut steps = Vec::new();
    if let (true, Some(path)) = (accepts("basic"), &config.htpasswd) {
        steps.push(ResolverStep::AttachBasic(path.clone()));
    }
    if let (true, Some(path)) = (accepts("digest"), &config.htdigest) {
        steps.push(ResolverStep::AttachDigest(path.clone()));
    }
    steps
}

/// Builds HTTP authentication adapters from configuration.
pub struct HttpAdapterFactory {
    resolvers: Arc<dyn ResolverFactory>,
}

impl HttpAdapterFactory {
    pub fn new(resolvers: Arc<dyn ResolverFactory>) -> Self {
        Self { resolvers }
    }

    /// Validates `config` and builds a fully wired adapter.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` when `accept_schemes` is missing or not a list,
    /// when `realm` is missing, when the digest scheme is accepted without both
    /// `digest_domains` and `nonce_timeout`, when the adapter rejects a value, or
    /// when a resolver cannot be constructed.
    #[instrument(skip_all)]
    pub fn build(&self, config: &Config) -> Result<HttpAdapter, Error> {
        let Some(AcceptSchemes::Sequence(schemes)) = &config.accept_schemes else {
            return Err(Error::Configuration(ACCEPT_SCHEMES_REQUIRED.to_string()));
        };

        let Some(realm) = &config.realm else {
            return Err(Error::Configuration(REALM_REQUIRED.to_string()));
        };

        if schemes.iter().any(|scheme| scheme == "digest")
            && (config.digest_domains.is_none() || config.nonce_timeout.is_none())
        {
            return Err(Error::Configuration(DIGEST_OPTIONS_REQUIRED.to_string()));
        }

        let mut adapter = HttpAdapter::new(AdapterOptions {
            accept_schemes: schemes.join(" "),
            realm: realm.clone(),
            digest_domains: config.digest_domains.clone(),
            nonce_timeout: config.nonce_timeout,
        })?;

        for step in resolver_steps(schemes, config) {
            step.apply(&mut adapter, self.resolvers.as_ref())?;
        }

        debug!(
            accept_schemes = adapter.accept_schemes(),
            "HTTP authentication adapter built"
        );
        Ok(adapter)
    }
}
