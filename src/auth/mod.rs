//! Authentication types for the Spotify API client.
//!
//! # Overview
//!
//! - [`AuthScopes`]: the ordered set of scopes requested on authorization
//! - [`Credential`]: the access token, refresh token and expiry kept per user
//! - [`SessionStore`]: where credentials live between requests
//! - [`oauth`]: the authorization-code flow, token refresh and the
//!   refresh-before-use gate
//!
//! # Token Expiry
//!
//! A credential expires after 90% of the lifespan the accounts service
//! declares. See [`session::calculate_expiry_utc`].
//!
//! # Example
//!
//! ```rust
//! use chrono::{Duration, Utc};
//! use spotify_api::auth::session::calculate_expiry_utc;
//! use spotify_api::{Credential, TokenState};
//!
//! let issued = Utc::now();
//! let credential = Credential::new("access", "refresh", calculate_expiry_utc(issued, 3600), issued);
//!
//! assert_eq!(credential.state_at(issued + Duration::seconds(3239)), TokenState::Valid);
//! assert_eq!(credential.state_at(issued + Duration::seconds(3240)), TokenState::Expired);
//! ```

pub mod oauth;
mod scopes;
pub mod session;
mod store;

pub use scopes::AuthScopes;
pub use session::{Credential, TokenResponse, TokenState};
pub use store::{InMemorySessionStore, SessionStore};
