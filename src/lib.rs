//! # Spotify API Rust Client
//!
//! A Rust client for the Spotify Web API, providing type-safe configuration,
//! the OAuth 2.0 authorization-code flow, transparent token refresh and
//! pagination over the Web API's list endpoints.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`SpotifyConfig`] and [`SpotifyConfigBuilder`]
//! - Validated newtypes for client credentials and endpoints
//! - Immutable request descriptors built by merging parameter fragments
//!   ([`clients::RequestDescriptor`])
//! - A transport that classifies every failure into [`ApiError`]
//! - The authorization-code grant and token refresh via [`auth::oauth`]
//! - Credentials that expire after 90% of their declared lifespan and are
//!   refreshed before use
//! - Sequential and bulk-parallel pagination via [`pagination`]
//! - [`SpotifyClient`], composing all of the above
//!
//! ## Quick Start
//!
//! ```rust
//! use spotify_api::{ClientId, ClientSecret, RedirectUri, SpotifyConfig};
//!
//! let config = SpotifyConfig::builder()
//!     .client_id(ClientId::new("your-client-id").unwrap())
//!     .client_secret(ClientSecret::new("your-client-secret").unwrap())
//!     .redirect_uri(RedirectUri::new("http://localhost:3000/callback").unwrap())
//!     .scopes("user-library-read playlist-read-private".parse().unwrap())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.scopes().len(), 2);
//! ```
//!
//! ## OAuth Authentication
//!
//! ```rust,ignore
//! use spotify_api::{SpotifyClient, SpotifyConfig, SessionStore};
//!
//! let client = SpotifyClient::new(SpotifyConfig::from_env()?)?;
//!
//! // Step 1: redirect the user to the authorize URL, keeping the state
//! let request = client.begin_authorization()?;
//!
//! // Step 2: on the callback, verify the state and exchange the code
//! if !request.state.matches(&callback_state) {
//!     return Err(StateMismatch);
//! }
//! let credential = client.exchange_code(&callback_code).await?;
//! store.set(&session_id, credential);
//! ```
//!
//! ## Making API Requests
//!
//! Operations on [`SpotifyClient`] take the stored [`Credential`] and refresh
//! it first if it has expired:
//!
//! ```rust,ignore
//! use spotify_api::pagination::{PaginationOptions, Strategy};
//!
//! let mut credential = store.get(&session_id).unwrap();
//!
//! let playlists = client.playlists(&mut credential, &PaginationOptions::default()).await?;
//! let first_hundred = client
//!     .saved_tracks(&mut credential, &PaginationOptions::new(50).item_cap(100))
//!     .await?;
//!
//! // Write the possibly refreshed credential back
//! store.set(&session_id, credential);
//! ```
//!
//! ## Error Handling
//!
//! ```rust
//! use std::collections::HashMap;
//! use serde_json::json;
//! use spotify_api::clients::{classify_response, ErrorKind};
//!
//! let error = classify_response(404, HashMap::new(), json!({
//!     "error": {"status": 404, "message": "Non existing id"}
//! }));
//! assert_eq!(error.kind(), ErrorKind::WebApi);
//! assert_eq!(error.http_status(), 404);
//! assert_eq!(error.public_message(), "Non existing id");
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **Thread-safe**: All types are `Send + Sync`
//! - **Async-first**: Designed for use with Tokio async runtime
//! - **No hidden retries**: Every failure is returned to the caller once

pub mod api;
pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod pagination;

// Re-export public types at crate root for convenience
pub use api::{ArtistDetail, SpotifyClient};
pub use auth::{AuthScopes, Credential, InMemorySessionStore, SessionStore, TokenState};
pub use config::{ClientId, ClientSecret, Endpoint, RedirectUri, SpotifyConfig, SpotifyConfigBuilder};
pub use error::ConfigError;

// Re-export HTTP client types
pub use clients::{ApiError, ErrorKind, HttpClient, HttpMethod, HttpResponse};

// Re-export OAuth types for convenience
pub use auth::oauth::{
    authorization_code_grant, create_authorize_url, refresh_access_token, StateParam,
};
