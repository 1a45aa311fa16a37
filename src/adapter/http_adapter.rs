use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use hyper::http::request::Parts;
use tracing::{debug, instrument, warn};

use super::Scheme;
use crate::auth::{AuthMiddleware, AuthResult};
use crate::error::Error;
use crate::identity::ClientIdentity;
use crate::request_ext::HeaderExt;
use crate::resolver::{Credentials, Resolver};

/// Options an [`HttpAdapter`] is constructed from.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AdapterOptions {
    /// Space-delimited list of accepted schemes.
    pub accept_schemes: String,
    pub realm: String,
    pub digest_domains: Option<String>,
    pub nonce_timeout: Option<u64>,
}

/// HTTP Basic/Digest authentication adapter.
pub struct HttpAdapter {
    accept_schemes: String,
    schemes: Vec<Scheme>,
    realm: String,
    digest_domains: Option<String>,
    nonce_timeout: Option<u64>,
    basic_resolver: Option<Arc<dyn Resolver>>,
    digest_resolver: Option<Arc<dyn Resolver>>,
}

fn is_printable(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| (0x20..=0x7e).contains(&b))
}

fn parse_schemes(accept_schemes: &str) -> Vec<Scheme> {
    let mut schemes = Vec::new();
    for name in accept_schemes.split(' ').filter(|name| !name.is_empty()) {
        match name.parse::<Scheme>() {
            Ok(scheme) if !schemes.contains(&scheme) => schemes.push(scheme),
            Ok(_) => {}
            Err(_) => warn!("Ignoring unsupported authentication scheme '{name}'"),
        }
    }
    schemes
}

impl HttpAdapter {
    pub fn new(options: AdapterOptions) -> Result<Self, Error> {
        let schemes = parse_schemes(&options.accept_schemes);
        if schemes.is_empty() {
            return Err(Error::Configuration(
                "No supported scheme in \"accept_schemes\"; valid values are: basic, digest"
                    .to_string(),
            ));
        }

        if !is_printable(&options.realm) || options.realm.contains(['"', ':']) {
            return Err(Error::Configuration(
                "\"realm\" must contain only printable characters, excluding quotation marks and colons"
                    .to_string(),
            ));
        }

        if schemes.contains(&Scheme::Digest) {
            let domains_valid = options
                .digest_domains
                .as_deref()
                .is_some_and(|domains| is_printable(domains) && !domains.contains('"'));
            if !domains_valid {
                return Err(Error::Configuration(
                    "\"digest_domains\" must contain only printable characters, excluding quotation marks"
                        .to_string(),
                ));
            }

            if !options.nonce_timeout.is_some_and(|timeout| timeout > 0) {
                return Err(Error::Configuration(
                    "\"nonce_timeout\" must be a positive number of seconds".to_string(),
                ));
            }
        }

        Ok(Self {
            accept_schemes: options.accept_schemes,
            schemes,
            realm: options.realm,
            digest_domains: options.digest_domains,
            nonce_timeout: options.nonce_timeout,
            basic_resolver: None,
            digest_resolver: None,
        })
    }

    pub fn accept_schemes(&self) -> &str {
        &self.accept_schemes
    }

    pub fn schemes(&self) -> &[Scheme] {
        &self.schemes
    }

    pub fn accepts(&self, scheme: Scheme) -> bool {
        self.schemes.contains(&scheme)
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    pub fn digest_domains(&self) -> Option<&str> {
        self.digest_domains.as_deref()
    }

    pub fn nonce_timeout(&self) -> Option<u64> {
        self.nonce_timeout
    }

    pub fn set_basic_resolver(&mut self, resolver: Arc<dyn Resolver>) {
        self.basic_resolver = Some(resolver);
    }

    pub fn set_digest_resolver(&mut self, resolver: Arc<dyn Resolver>) {
        self.digest_resolver = Some(resolver);
    }

    pub fn basic_resolver(&self) -> Option<&Arc<dyn Resolver>> {
        self.basic_resolver.as_ref()
    }

    pub fn digest_resolver(&self) -> Option<&Arc<dyn Resolver>> {
        self.digest_resolver.as_ref()
    }

    pub fn has_resolver(&self) -> bool {
        self.basic_resolver.is_some() || self.digest_resolver.is_some()
    }

    fn resolver_for(&self, scheme: Scheme) -> Option<&Arc<dyn Resolver>> {
        match scheme {
            Scheme::Basic => self.basic_resolver.as_ref(),
            Scheme::Digest => self.digest_resolver.as_ref(),
        }
    }

    fn extract_credentials(parts: &Parts, scheme: Scheme) -> Result<Credentials, Error> {
        match scheme {
            Scheme::Basic => {
                let (username, password) = parts.basic_auth().ok_or_else(|| {
                    Error::Unauthorized("Malformed Basic credentials".to_string())
                })?;
                Ok(Credentials::Basic { username, password })
            }
            Scheme::Digest => {
                let params = parts.digest_params().ok_or_else(|| {
                    Error::Unauthorized("Malformed Digest credentials".to_string())
                })?;
                let username = params.get("username").cloned().ok_or_else(|| {
                    Error::Unauthorized("Digest credentials without username".to_string())
                })?;
                Ok(Credentials::Digest { username, params })
            }
        }
    }
}

impl fmt::Debug for HttpAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpAdapter")
            .field("accept_schemes", &self.accept_schemes)
            .field("realm", &self.realm)
            .field("digest_domains", &self.digest_domains)
            .field("nonce_timeout", &self.nonce_timeout)
            .field("basic_resolver", &self.basic_resolver.is_some())
            .field("digest_resolver", &self.digest_resolver.is_some())
            .finish()
    }
}

#[async_trait]
impl AuthMiddleware for HttpAdapter {
    #[instrument(skip_all, fields(realm = %self.realm))]
    async fn authenticate(
        &self,
        parts: &Parts,
        identity: &mut ClientIdentity,
    ) -> Result<AuthResult, Error> {
        let Some((name, _)) = parts.authorization() else {
            return Ok(AuthResult::NoCredentials);
        };

        let Some(scheme) = Scheme::from_header_name(&name).filter(|s| self.accepts(*s)) else {
            debug!("Authorization scheme '{name}' is not accepted");
            return Ok(AuthResult::NoCredentials);
        };

        let Some(resolver) = self.resolver_for(scheme) else {
            warn!("No {scheme} resolver attached to the HTTP adapter");
            return Err(Error::Unauthorized(format!(
                "{scheme} authentication is not available"
            )));
        };

        let credentials = Self::extract_credentials(parts, scheme)?;

        match resolver.resolve(&credentials, &self.realm)? {
            Some(identity_id) => {
                identity.id = Some(identity_id);
                identity.username = Some(credentials.username().to_string());
                identity.method = Some(scheme.into());
                Ok(AuthResult::Authenticated)
            }
            None => {
                debug!("Credentials rejected by {scheme} resolver");
                Err(Error::Unauthorized("Invalid credentials".to_string()))
            }
        }
    }
}
