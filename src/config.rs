//! Connection configuration.
//!
//! `ProviderConfig` is what the host hands over; `ConnectionConfig` is the
//! validated result after merging it with the `GRAPHDB_*` environment.

use std::env;
use std::time::Duration;

use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use tracing::warn;

use crate::error::Error;

/// Environment variable for the server host.
pub const ENV_HOST: &str = "GRAPHDB_HOST";
/// Environment variable for the server port.
pub const ENV_PORT: &str = "GRAPHDB_PORT";
/// Environment variable for the API username.
pub const ENV_USERNAME: &str = "GRAPHDB_USERNAME";
/// Environment variable for the API password.
pub const ENV_PASSWORD: &str = "GRAPHDB_PASSWORD";

/// Default GraphDB workbench port.
pub const DEFAULT_PORT: u16 = 7200;

/// Settings for reaching one GraphDB server.
///
/// Construct with [`ConnectionConfig::new`] and adjust with the `with_*`
/// mutators.
#[derive(Debug)]
pub struct ConnectionConfig {
    host: String,
    port: u16,
    username: String,
    password: SecretString,
    timeout: Option<Duration>,
}

impl ConnectionConfig {
    /// Create a configuration for `host` with default port and empty credentials.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if `host` is empty, uses a scheme other
    /// than `http` or `https`, or carries a port, path, query or credentials.
    pub fn new(host: impl Into<String>) -> Result<Self, Error> {
        let host = host.into();
        if host.trim().is_empty() {
            return Err(Error::Configuration(
                "GraphDB host must not be empty".to_string(),
            ));
        }
        validate_host(&host)?;

        Ok(Self {
            host,
            port: DEFAULT_PORT,
            username: String::new(),
            password: SecretString::from(String::new()),
            timeout: None,
        })
    }

    /// Set the port. Port 0 is rejected when the client is built.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = SecretString::from(password.into());
        self
    }

    /// Set a request timeout. Without one the HTTP client defaults apply.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &SecretString {
        &self.password
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Base URL of the REST API, e.g. `http://localhost:7200/rest`.
    ///
    /// A scheme in `host` is kept as given; a bare host is reached over `http`.
    #[must_use]
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.contains("://") {
            format!("{host}:{}/rest", self.port)
        } else {
            format!("http://{host}:{}/rest", self.port)
        }
    }

    /// Parsed [`base_url`](Self::base_url) for a usable port.
    pub(crate) fn endpoint(&self) -> Result<Url, Error> {
        if self.port == 0 {
            return Err(Error::Configuration(
                "Port must be between 1 and 65535, got 0".to_string(),
            ));
        }
        let base_url = self.base_url();
        Url::parse(&base_url)
            .map_err(|e| Error::Configuration(format!("Invalid GraphDB URL {base_url}: {e}")))
    }
}

/// Accept `name`, `[v6 address]` or either behind `http://` / `https://`.
///
/// The port comes from its own setting and the `/rest` path is fixed, so a
/// host carrying either would produce a broken base URL.
fn validate_host(host: &str) -> Result<(), Error> {
    let authority = match host.split_once("://") {
        Some((scheme, rest)) => {
            if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
                return Err(Error::Configuration(format!(
                    "Unsupported scheme {scheme} in GraphDB host {host}"
                )));
            }
            rest
        }
        None => host,
    };
    let authority = authority.trim_end_matches('/');

    let bracketed = authority.starts_with('[') && authority.ends_with(']');
    let invalid = authority.is_empty()
        || authority.chars().any(|c| {
            c.is_whitespace() || matches!(c, '/' | '?' | '#' | '@') || (c == ':' && !bracketed)
        });
    if invalid {
        return Err(Error::Configuration(format!(
            "GraphDB host {host} must be a bare host name; set the port separately and leave out any path"
        )));
    }
    Ok(())
}

/// Connection settings as supplied by the host, before environment merging.
///
/// Every attribute is optional; unset values fall back to the matching
/// `GRAPHDB_*` environment variable and then to the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ProviderConfig {
    pub host: Option<String>,
    pub port: Option<i64>,
    pub username: Option<String>,
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub password: Option<SecretString>,
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

impl ProviderConfig {
    /// Merge with the process environment.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if no host is set or the port is out of range.
    pub fn resolve(&self) -> Result<ConnectionConfig, Error> {
        self.resolve_with(|key| env::var(key).ok())
    }

    /// Merge with an arbitrary environment lookup.
    ///
    /// Configured values win over the environment. Empty environment values
    /// count as unset.
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` if no host is set or the port is out of range.
    pub fn resolve_with<F>(&self, lookup: F) -> Result<ConnectionConfig, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let host = self
            .host
            .clone()
            .or_else(|| lookup(ENV_HOST))
            .unwrap_or_default();
        if host.is_empty() {
            return Err(Error::Configuration(format!(
                "Missing GraphDB host. Set the value in the configuration or use the \
                 {ENV_HOST} environment variable. If either is already set, ensure the \
                 value is not empty."
            )));
        }

        let port = match self.port {
            Some(port) => u16::try_from(port)
                .ok()
                .filter(|p| *p != 0)
                .ok_or_else(|| {
                    Error::Configuration(format!("Port must be between 1 and 65535, got {port}"))
                })?,
            None => lookup(ENV_PORT).map_or(DEFAULT_PORT, |raw| parse_env_port(&raw)),
        };

        let username = self
            .username
            .clone()
            .or_else(|| lookup(ENV_USERNAME))
            .unwrap_or_default();

        let password = match &self.password {
            Some(secret) => secret.expose_secret().to_string(),
            None => lookup(ENV_PASSWORD).unwrap_or_default(),
        };

        Ok(ConnectionConfig::new(host)?
            .with_port(port)
            .with_username(username)
            .with_password(password))
    }
}

/// Parse `GRAPHDB_PORT`, keeping the default when the value is unusable.
fn parse_env_port(raw: &str) -> u16 {
    match raw.trim().parse::<u16>() {
        Ok(port) if port != 0 => port,
        _ => {
            warn!(
                value = raw,
                "Failed to parse {ENV_PORT}, so the variable is not used"
            );
            DEFAULT_PORT
        }
    }
}
