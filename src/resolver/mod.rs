use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::adapter::Scheme;
use crate::error::Error;

/// Credentials presented by a client, as extracted from the `Authorization` header.
#[derive(Clone, Debug, PartialEq)]
pub enum Credentials {
    Basic {
        username: String,
        password: String,
    },
    Digest {
        username: String,
        params: HashMap<String, String>,
    },
}

impl Credentials {
    pub fn username(&self) -> &str {
        match self {
            Credentials::Basic { username, .. } | Credentials::Digest { username, .. } => username,
        }
    }

    pub fn scheme(&self) -> Scheme {
        match self {
            Credentials::Basic { .. } => Scheme::Basic,
            Credentials::Digest { .. } => Scheme::Digest,
        }
    }
}

/// Looks up and verifies credentials against a stored set.
#[cfg_attr(test, mockall::automock)]
pub trait Resolver: Send + Sync {
    /// Returns:
    /// - `Ok(Some(identity_id))` when the credentials are valid for `realm`
    /// - `Ok(None)` when they are not
    /// - `Err(Error)` when the credential store cannot be consulted
    fn resolve(&self, credentials: &Credentials, realm: &str) -> Result<Option<String>, Error>;
}

/// Constructs the resolver attached to an adapter for each supported scheme.
#[cfg_attr(test, mockall::automock)]
pub trait ResolverFactory: Send + Sync {
    /// Resolver backed by an htpasswd-style file.
    fn basic(&self, path: &Path) -> Result<Arc<dyn Resolver>, Error>;
    /// Resolver backed by an htdigest-style file.
    fn digest(&self, path: &Path) -> Result<Arc<dyn Resolver>, Error>;
}

/// A resolver bound to a credential file.
///
/// The file is checked for existence when the resolver is built; reading and
/// verifying its entries is left to the credential backend of the host
/// application, so `resolve` reports an error.
#[derive(Clone, Debug, PartialEq)]
pub struct FileResolver {
    scheme: Scheme,
    path: PathBuf,
}

impl FileResolver {
    pub fn new(scheme: Scheme, path: &Path) -> Result<Self, Error> {
        let metadata = fs::metadata(path).map_err(|error| {
            Error::Configuration(format!(
                "Credential file '{}' for {scheme} authentication is not readable: {error}",
                path.display()
            ))
        })?;

        if !metadata.is_file() {
            return Err(Error::Configuration(format!(
                "Credential file '{}' for {scheme} authentication is not a regular file",
                path.display()
            )));
        }

        Ok(Self {
            scheme,
            path: path.to_path_buf(),
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Resolver for FileResolver {
    #[instrument(skip_all, fields(username = credentials.username()))]
    fn resolve(&self, credentials: &Credentials, _realm: &str) -> Result<Option<String>, Error> {
        if credentials.scheme() != self.scheme {
            debug!("Credentials scheme does not match resolver scheme");
            return Ok(None);
        }

        Err(Error::Resolver(format!(
            "No credential backend available for '{}'",
            self.path.display()
        )))
    }
}

/// Builds a [`FileResolver`] for each scheme.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileResolverFactory;

impl ResolverFactory for FileResolverFactory {
    fn basic(&self, path: &Path) -> Result<Arc<dyn Resolver>, Error> {
        Ok(Arc::new(FileResolver::new(Scheme::Basic, path)?))
    }

    fn digest(&self, path: &Path) -> Result<Arc<dyn Resolver>, Error> {
        Ok(Arc::new(FileResolver::new(Scheme::Digest, path)?))
    }
}
