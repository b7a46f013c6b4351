//! Configuration types for the Spotify API client.
//!
//! This module provides the configuration used to talk to the accounts
//! service and the Web API.
//!
//! # Overview
//!
//! - [`SpotifyConfig`]: The main configuration struct holding all client settings
//! - [`SpotifyConfigBuilder`]: A builder for constructing [`SpotifyConfig`] instances
//! - [`ClientId`] / [`ClientSecret`]: Validated application credentials
//! - [`RedirectUri`]: The OAuth redirect URI registered for the application
//! - [`Endpoint`]: Scheme, host and port of an upstream service
//!
//! # Example
//!
//! ```rust
//! use spotify_api::{SpotifyConfig, ClientId, ClientSecret, RedirectUri};
//!
//! let config = SpotifyConfig::builder()
//!     .client_id(ClientId::new("my-client-id").unwrap())
//!     .client_secret(ClientSecret::new("my-secret").unwrap())
//!     .redirect_uri(RedirectUri::new("http://localhost:3000/callback").unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.api_endpoint().host(), "api.spotify.com");
//! ```

mod newtypes;

pub use newtypes::{ClientId, ClientSecret, Endpoint, RedirectUri};

use crate::auth::AuthScopes;
use crate::error::ConfigError;
use std::time::Duration;

/// Configuration for the Spotify API client.
///
/// `SpotifyConfig` is `Clone`, `Send`, and `Sync`, making it safe to share
/// across threads and async tasks.
#[derive(Clone, Debug)]
pub struct SpotifyConfig {
    client_id: ClientId,
    client_secret: ClientSecret,
    redirect_uri: Option<RedirectUri>,
    scopes: AuthScopes,
    api_endpoint: Endpoint,
    accounts_endpoint: Endpoint,
    user_agent_prefix: Option<String>,
    request_timeout: Option<Duration>,
}

impl SpotifyConfig {
    /// Creates a new builder for constructing a `SpotifyConfig`.
    #[must_use]
    pub fn builder() -> SpotifyConfigBuilder {
        SpotifyConfigBuilder::new()
    }

    /// Builds a configuration from the `CLIENT_ID`, `CLIENT_SECRET` and
    /// `REDIRECT_URI` environment variables. All other settings use their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `CLIENT_ID` or `CLIENT_SECRET`
    /// is unset, or the validation error of any value that is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let read = |name: &'static str| {
            std::env::var(name).map_err(|_| ConfigError::MissingEnvVar { name })
        };

        let mut builder = Self::builder()
            .client_id(ClientId::new(read("CLIENT_ID")?)?)
            .client_secret(ClientSecret::new(read("CLIENT_SECRET")?)?);

        if let Ok(uri) = read("REDIRECT_URI") {
            builder = builder.redirect_uri(RedirectUri::new(uri)?);
        }

        builder.build()
    }

    /// Returns the client ID.
    #[must_use]
    pub const fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Returns the client secret.
    #[must_use]
    pub const fn client_secret(&self) -> &ClientSecret {
        &self.client_secret
    }

    /// Returns the redirect URI, if configured.
    #[must_use]
    pub const fn redirect_uri(&self) -> Option<&RedirectUri> {
        self.redirect_uri.as_ref()
    }

    /// Returns the OAuth scopes requested during authorization.
    #[must_use]
    pub const fn scopes(&self) -> &AuthScopes {
        &self.scopes
    }

    /// Returns the Web API endpoint.
    #[must_use]
    pub const fn api_endpoint(&self) -> &Endpoint {
        &self.api_endpoint
    }

    /// Returns the accounts service endpoint.
    #[must_use]
    pub const fn accounts_endpoint(&self) -> &Endpoint {
        &self.accounts_endpoint
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the transport timeout, if configured.
    #[must_use]
    pub const fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }
}

// Verify SpotifyConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<SpotifyConfig>();
};

/// Builder for constructing [`SpotifyConfig`] instances.
///
/// Required fields are `client_id` and `client_secret`.
///
/// # Defaults
///
/// - `scopes`: [`AuthScopes::app_default`]
/// - `api_endpoint`: [`Endpoint::api`]
/// - `accounts_endpoint`: [`Endpoint::accounts`]
/// - `redirect_uri`, `user_agent_prefix`, `request_timeout`: `None`
#[derive(Debug, Default)]
pub struct SpotifyConfigBuilder {
    client_id: Option<ClientId>,
    client_secret: Option<ClientSecret>,
    redirect_uri: Option<RedirectUri>,
    scopes: Option<AuthScopes>,
    api_endpoint: Option<Endpoint>,
    accounts_endpoint: Option<Endpoint>,
    user_agent_prefix: Option<String>,
    request_timeout: Option<Duration>,
}

impl SpotifyConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the client ID (required).
    #[must_use]
    pub fn client_id(mut self, id: ClientId) -> Self {
        self.client_id = Some(id);
        self
    }

    /// Sets the client secret (required).
    #[must_use]
    pub fn client_secret(mut self, secret: ClientSecret) -> Self {
        self.client_secret = Some(secret);
        self
    }

    /// Sets the OAuth redirect URI.
    #[must_use]
    pub fn redirect_uri(mut self, uri: RedirectUri) -> Self {
        self.redirect_uri = Some(uri);
        self
    }

    /// Sets the OAuth scopes.
    #[must_use]
    pub fn scopes(mut self, scopes: AuthScopes) -> Self {
        self.scopes = Some(scopes);
        self
    }

    /// Overrides the Web API endpoint.
    #[must_use]
    pub fn api_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.api_endpoint = Some(endpoint);
        self
    }

    /// Overrides the accounts service endpoint.
    #[must_use]
    pub fn accounts_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.accounts_endpoint = Some(endpoint);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets a timeout applied by the transport to every request.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Builds the [`SpotifyConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `client_id` or
    /// `client_secret` are not set.
    pub fn build(self) -> Result<SpotifyConfig, ConfigError> {
        let client_id = self
            .client_id
            .ok_or(ConfigError::MissingRequiredField { field: "client_id" })?;
        let client_secret = self
            .client_secret
            .ok_or(ConfigError::MissingRequiredField {
                field: "client_secret",
            })?;

        Ok(SpotifyConfig {
            client_id,
            client_secret,
            redirect_uri: self.redirect_uri,
            scopes: self.scopes.unwrap_or_else(AuthScopes::app_default),
            api_endpoint: self.api_endpoint.unwrap_or_else(Endpoint::api),
            accounts_endpoint: self.accounts_endpoint.unwrap_or_else(Endpoint::accounts),
            user_agent_prefix: self.user_agent_prefix,
            request_timeout: self.request_timeout,
        })
    }
}
