//! Credential resolution for the search request.
//!
//! Credentials come from an ordered list of providers:
//! - `BearerTokenProvider`: `GRAFANA_API_TOKEN`
//! - `EnvBasicAuthProvider`: `GRAFANA_BASIC_AUTH_USER` + `GRAFANA_BASIC_AUTH_PASSWORD`
//! - `NetrcProvider`: `~/.netrc` (or `NETRC`) entry for the request host
//!
//! The first provider that yields credentials wins. When none does, the
//! request still carries basic auth built from whatever explicit values exist.

pub mod env;
pub mod netrc;

use std::path::PathBuf;

use reqwest::Url;
use reqwest::blocking::RequestBuilder;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::Config;

pub use env::{BearerTokenProvider, EnvBasicAuthProvider};
pub use netrc::NetrcProvider;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("ENV vars not set: {}", .0.join(", "))]
    MissingEnv(Vec<&'static str>),
    #[error("unable to locate home directory for .netrc")]
    NoHome,
    #[error("unable to load from netrc {}: {source}", .path.display())]
    NetrcRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed netrc {} line {line}: {reason}", .path.display())]
    NetrcParse {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    #[error("no netrc entry for {host} in {}", .path.display())]
    NetrcNoMachine { host: String, path: PathBuf },
    #[error("request url has no host")]
    NoHost,
}

#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Bearer(String),
    Basic { username: String, password: String },
}

impl Credentials {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Attaches these credentials to `request`.
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Bearer(token) => request.bearer_auth(token),
            Self::Basic { username, password } => request.basic_auth(username, Some(password)),
        }
    }

    fn scheme(&self) -> &'static str {
        match self {
            Self::Bearer(_) => "bearer",
            Self::Basic { .. } => "basic",
        }
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer(***)"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}

/// A source of credentials for a request URL.
///
/// `Ok(None)` means the provider has nothing to offer; `Err` means its lookup
/// failed. Either way the chain moves on to the next provider.
pub trait CredentialProvider {
    fn name(&self) -> &'static str;
    fn credentials(&self, url: &Url) -> Result<Option<Credentials>, AuthError>;
}

pub struct CredentialChain {
    providers: Vec<Box<dyn CredentialProvider>>,
    fallback: Credentials,
}

impl CredentialChain {
    pub fn new(providers: Vec<Box<dyn CredentialProvider>>, fallback: Credentials) -> Self {
        Self {
            providers,
            fallback,
        }
    }

    /// Token, then explicit basic auth, then netrc; falls back to basic auth
    /// with the (possibly empty) configured user and password.
    pub fn from_config(config: &Config) -> Self {
        let providers: Vec<Box<dyn CredentialProvider>> = vec![
            Box::new(BearerTokenProvider::new(config.api_token.clone())),
            Box::new(EnvBasicAuthProvider::new(
                config.basic_user.clone(),
                config.basic_password.clone(),
            )),
            Box::new(NetrcProvider::new(config.netrc.clone())),
        ];
        let fallback = Credentials::basic(
            config.basic_user.clone().unwrap_or_default(),
            config.basic_password.clone().unwrap_or_default(),
        );
        Self::new(providers, fallback)
    }

    pub fn resolve(&self, url: &Url) -> Credentials {
        for provider in &self.providers {
            match provider.credentials(url) {
                Ok(Some(creds)) => {
                    debug!(
                        provider = provider.name(),
                        scheme = creds.scheme(),
                        "resolved credentials"
                    );
                    return creds;
                }
                Ok(None) => debug!(provider = provider.name(), "no credentials"),
                Err(err) => error!("load credentials: {err}"),
            }
        }
        info!("load credentials: falling back to configured basic auth");
        self.fallback.clone()
    }
}
