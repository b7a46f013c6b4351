//! OAuth 2.0 authorization-code flow against the accounts service.
//!
//! # Authorization Code Grant
//!
//! 1. **Authorization** ([`begin_authorization`] / [`create_authorize_url`]):
//!    generate a [`StateParam`] and redirect the user to the authorize URL.
//! 2. **Callback**: compare the callback's `state` with the stored one using
//!    [`StateParam::matches`], then exchange the `code` with
//!    [`authorization_code_grant`].
//!
//! # Token Refresh
//!
//! Access tokens expire. [`ensure_fresh_token`] runs before every
//! authenticated call and uses [`refresh_access_token`] when the stored
//! credential has expired.
//!
//! # Example
//!
//! ```rust,ignore
//! use spotify_api::auth::oauth::{authorization_code_grant, begin_authorization};
//!
//! // Step 1: redirect the user
//! let request = begin_authorization(&config)?;
//! session.set("oauth_state", request.state.as_ref());
//! // redirect to request.url
//!
//! // Step 2: handle the callback
//! if !request.state.matches(&query.state) {
//!     return Err(StateMismatch);
//! }
//! let credential = authorization_code_grant(&config, &http, &query.code).await?;
//! ```

mod authorize;
mod lifecycle;
mod state;
mod token;

pub use authorize::{begin_authorization, create_authorize_url, AuthorizationRequest};
pub use lifecycle::{ensure_fresh_token, ensure_fresh_token_at};
pub use state::StateParam;
pub use token::{authorization_code_grant, refresh_access_token};
