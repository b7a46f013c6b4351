//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use reqwest::Url;
use std::fmt;

/// A validated Spotify application client ID.
///
/// # Example
///
/// ```rust
/// use spotify_api::ClientId;
///
/// let id = ClientId::new("my-client-id").unwrap();
/// assert_eq!(id.as_ref(), "my-client-id");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientId(String);

impl ClientId {
    /// Creates a new validated client ID.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyClientId`] if the ID is empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ConfigError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ConfigError::EmptyClientId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated Spotify application client secret.
///
/// The `Debug` implementation masks the secret value, displaying only
/// `ClientSecret(*****)`.
///
/// # Example
///
/// ```rust
/// use spotify_api::ClientSecret;
///
/// let secret = ClientSecret::new("my-secret").unwrap();
/// assert_eq!(format!("{:?}", secret), "ClientSecret(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSecret(String);

impl ClientSecret {
    /// Creates a new validated client secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyClientSecret`] if the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(ConfigError::EmptyClientSecret);
        }
        Ok(Self(secret))
    }
}

impl AsRef<str> for ClientSecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(*****)")
    }
}

/// A validated OAuth redirect URI.
///
/// Spotify compares the redirect URI byte-for-byte with the one registered for
/// the application, so the value is kept exactly as given once it parses as an
/// absolute URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedirectUri(String);

impl RedirectUri {
    /// Creates a new validated redirect URI.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRedirectUri`] if the URI is not an
    /// absolute URL with a host.
    pub fn new(uri: impl Into<String>) -> Result<Self, ConfigError> {
        let uri = uri.into().trim().to_string();
        match Url::parse(&uri) {
            Ok(parsed) if parsed.host_str().is_some() => Ok(Self(uri)),
            _ => Err(ConfigError::InvalidRedirectUri { uri }),
        }
    }
}

impl AsRef<str> for RedirectUri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The scheme, host and port of an upstream service.
///
/// Requests are assembled from an endpoint plus a path, so the endpoint never
/// carries a path of its own.
///
/// # Example
///
/// ```rust
/// use spotify_api::Endpoint;
///
/// let endpoint = Endpoint::parse("http://127.0.0.1:8080").unwrap();
/// assert_eq!(endpoint.scheme(), "http");
/// assert_eq!(endpoint.host(), "127.0.0.1");
/// assert_eq!(endpoint.port(), 8080);
///
/// assert_eq!(Endpoint::api().host(), "api.spotify.com");
/// assert_eq!(Endpoint::api().port(), 443);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    scheme: String,
    host: String,
    port: u16,
}

impl Endpoint {
    /// Host of the Web API.
    pub const API_HOST: &'static str = "api.spotify.com";
    /// Host of the accounts (authorization) service.
    pub const ACCOUNTS_HOST: &'static str = "accounts.spotify.com";

    /// Creates an endpoint from its parts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] if the scheme is not http or
    /// https, or the host is empty.
    pub fn new(
        scheme: impl Into<String>,
        host: impl Into<String>,
        port: u16,
    ) -> Result<Self, ConfigError> {
        let scheme = scheme.into().to_lowercase();
        let host = host.into();
        if !matches!(scheme.as_str(), "http" | "https") || host.is_empty() {
            return Err(ConfigError::InvalidEndpoint {
                url: format!("{scheme}://{host}:{port}"),
            });
        }
        Ok(Self { scheme, host, port })
    }

    /// Parses an endpoint from a URL such as `https://api.spotify.com` or
    /// `http://127.0.0.1:8080`. The default port for the scheme is used when
    /// none is given.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpoint`] if the URL cannot be parsed.
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidEndpoint {
            url: url.to_string(),
        };
        let parsed = Url::parse(url.trim()).map_err(|_| invalid())?;
        let host = parsed.host_str().ok_or_else(invalid)?;
        let port = parsed.port_or_known_default().ok_or_else(invalid)?;
        Self::new(parsed.scheme(), host, port)
    }

    /// The Spotify Web API endpoint.
    #[must_use]
    pub fn api() -> Self {
        Self {
            scheme: "https".to_string(),
            host: Self::API_HOST.to_string(),
            port: 443,
        }
    }

    /// The Spotify accounts endpoint.
    #[must_use]
    pub fn accounts() -> Self {
        Self {
            scheme: "https".to_string(),
            host: Self::ACCOUNTS_HOST.to_string(),
            port: 443,
        }
    }

    /// Returns the scheme.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }
}
