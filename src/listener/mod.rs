#[cfg(test)]
mod tests;

mod oauth2;

use std::sync::Arc;

use hyper::http::request::Parts;
use tracing::{debug, info, instrument, warn};

use crate::adapter::{HttpAdapter, HttpAdapterFactory, Scheme};
use crate::auth::{AuthMiddleware, AuthResult};
use crate::configuration::Configuration;
use crate::error::Error;
use crate::identity::{AuthMethod, ClientIdentity};
use crate::request_ext::HeaderExt;
use crate::resolver::ResolverFactory;
pub use oauth2::OAuth2Server;
#[cfg(test)]
pub use oauth2::MockOAuth2Server;

/// Services the listener selector draws from.
#[derive(Clone)]
pub struct Services {
    config: Option<Configuration>,
    oauth2_server: Option<Arc<dyn OAuth2Server>>,
    resolver_factory: Arc<dyn ResolverFactory>,
}

impl Services {
    pub fn new(resolver_factory: Arc<dyn ResolverFactory>) -> Self {
        Self {
            config: None,
            oauth2_server: None,
            resolver_factory,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: Configuration) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn with_oauth2_server(mut self, server: Arc<dyn OAuth2Server>) -> Self {
        self.oauth2_server = Some(server);
        self
    }
}

/// Authenticates incoming requests with the mechanisms chosen at startup.
#[derive(Clone, Default)]
pub struct AuthenticationListener {
    http_adapter: Option<Arc<HttpAdapter>>,
    oauth2_server: Option<Arc<dyn OAuth2Server>>,
}

/// Builds the authentication listener from the configured services.
///
/// The HTTP adapter factory is only invoked when the
/// `[mvc_auth.authentication.http]` section exists. An adapter that ends up
/// without any resolver is not wired into the listener.
///
/// # Errors
///
/// Propagates the `Error::Configuration` raised by the adapter factory.
#[instrument(skip_all)]
pub fn select_authentication_mechanism(
    services: &Services,
) -> Result<AuthenticationListener, Error> {
    let mut listener = AuthenticationListener::default();

    let http_config = services
        .config
        .as_ref()
        .and_then(Configuration::http_authentication);

    if let Some(http_config) = http_config {
        let factory = HttpAdapterFactory::new(services.resolver_factory.clone());
        let adapter = factory.build(http_config)?;

        if adapter.has_resolver() {
            info!(
                accept_schemes = adapter.accept_schemes(),
                "HTTP authentication enabled"
            );
            listener.http_adapter = Some(Arc::new(adapter));
        } else {
            debug!("HTTP adapter has no credential resolver, not enabling HTTP authentication");
        }
    } else {
        debug!("No HTTP authentication configuration found");
    }

    if let Some(server) = &services.oauth2_server {
        info!("OAuth2 authentication enabled");
        listener.oauth2_server = Some(server.clone());
    }

    Ok(listener)
}

impl AuthenticationListener {
    pub fn http_adapter(&self) -> Option<&Arc<HttpAdapter>> {
        self.http_adapter.as_ref()
    }

    pub fn oauth2_server(&self) -> Option<&Arc<dyn OAuth2Server>> {
        self.oauth2_server.as_ref()
    }

    /// Authenticates the current request.
    ///
    /// Bearer tokens go to the OAuth2 server, Basic and Digest credentials to
    /// the HTTP adapter. Requests without usable credentials yield a guest identity.
    ///
    /// # Errors
    ///
    /// Returns `Error::Unauthorized` when credentials are present but rejected,
    /// or the resolver error when credentials cannot be checked.
    #[instrument(skip_all, fields(auth_method = tracing::field::Empty))]
    pub async fn authenticate(&self, parts: &Parts) -> Result<ClientIdentity, Error> {
        let mut identity = ClientIdentity::default();

        let scheme = parts.authorization().map(|(name, _)| name);

        match (scheme, &self.oauth2_server, &self.http_adapter) {
            (Some(name), Some(server), _) if name.eq_ignore_ascii_case("Bearer") => {
                let Some(client_id) = server.verify_resource_request(parts).await? else {
                    warn!("OAuth2 token rejected");
                    return Err(Error::Unauthorized("Invalid bearer token".to_string()));
                };
                identity.id = Some(client_id);
                identity.method = Some(AuthMethod::OAuth2);
            }
            (Some(name), _, Some(adapter)) if Scheme::from_header_name(&name).is_some() => {
                if adapter.authenticate(parts, &mut identity).await? == AuthResult::NoCredentials {
                    debug!("HTTP adapter found no credentials it accepts");
                }
            }
            _ => debug!("No authentication mechanism applies to this request"),
        }

        let method = identity.method.map_or("anonymous", AuthMethod::as_str);
        tracing::Span::current().record("auth_method", method);

        Ok(identity)
    }
}
