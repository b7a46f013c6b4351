//! Stored credentials for authenticated Web API calls.
//!
//! This module provides the [`Credential`] record a session store keeps per
//! signed-in user, the [`TokenResponse`] returned by the accounts service,
//! and the expiry arithmetic shared by the authorization-code and refresh
//! grants.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Share of the issuer-declared lifespan, in per-mille, after which a token
/// is treated as expired.
const EXPIRY_PER_MILLE: i64 = 900;

/// Computes when a token issued at `issued_at` with a declared lifespan of
/// `expires_in` seconds must be considered expired.
///
/// Only 90% of the lifespan is granted, so a token is refreshed before
/// requests in flight or clock skew can observe it expiring upstream. A
/// lifespan too large to represent saturates at the latest representable
/// instant.
///
/// # Example
///
/// ```rust
/// use chrono::{Duration, TimeZone, Utc};
/// use spotify_api::auth::session::calculate_expiry_utc;
///
/// let issued_at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
/// let expiry = calculate_expiry_utc(issued_at, 3600);
/// assert_eq!(expiry - issued_at, Duration::seconds(3240));
/// ```
#[must_use]
pub fn calculate_expiry_utc(issued_at: DateTime<Utc>, expires_in: u64) -> DateTime<Utc> {
    let lifespan_ms = i64::try_from(expires_in)
        .unwrap_or(i64::MAX / 1000)
        .saturating_mul(EXPIRY_PER_MILLE);
    issued_at
        .checked_add_signed(Duration::milliseconds(lifespan_ms))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Whether a credential may be used as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenState {
    /// The current time is before the expiry.
    Valid,
    /// The current time is at or past the expiry; a refresh is required.
    Expired,
}

/// Response body of the accounts service token endpoint.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct TokenResponse {
    /// The new access token.
    pub access_token: String,
    /// Token type, always `Bearer`.
    #[serde(default)]
    pub token_type: String,
    /// Declared lifespan in seconds.
    pub expires_in: u64,
    /// A refresh token. Always present for the authorization-code grant,
    /// optional on refresh.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Space-separated granted scopes.
    #[serde(default)]
    pub scope: Option<String>,
}

/// The credential a session store keeps for one signed-in user.
///
/// The client only ever reads `access_token`, `refresh_token` and
/// `expiry_utc`, and on refresh rewrites `access_token` and `expiry_utc` in
/// place. Creating and destroying credentials belongs to the caller.
///
/// # Example
///
/// ```rust
/// use chrono::{Duration, Utc};
/// use spotify_api::{Credential, TokenState};
///
/// let now = Utc::now();
/// let credential = Credential::new("access", "refresh", now + Duration::minutes(10), now);
/// assert_eq!(credential.state_at(now), TokenState::Valid);
/// assert_eq!(credential.state_at(now + Duration::minutes(10)), TokenState::Expired);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Bearer token for Web API calls.
    pub access_token: String,
    /// Token used to obtain new access tokens.
    pub refresh_token: String,
    /// Moment from which the access token must not be used.
    pub expiry_utc: DateTime<Utc>,
    /// Moment the credential was first issued.
    pub creation_utc: DateTime<Utc>,
}

impl Credential {
    /// Creates a credential from its parts.
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expiry_utc: DateTime<Utc>,
        creation_utc: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expiry_utc,
            creation_utc,
        }
    }

    /// Builds a credential from an authorization-code grant response
    /// received at `now`.
    ///
    /// Returns `None` when the response carries no refresh token.
    #[must_use]
    pub fn from_token_response(response: &TokenResponse, now: DateTime<Utc>) -> Option<Self> {
        let refresh_token = response.refresh_token.clone()?;
        Some(Self {
            access_token: response.access_token.clone(),
            refresh_token,
            expiry_utc: calculate_expiry_utc(now, response.expires_in),
            creation_utc: now,
        })
    }

    /// Returns the token state at `now`.
    #[must_use]
    pub fn state_at(&self, now: DateTime<Utc>) -> TokenState {
        if now < self.expiry_utc {
            TokenState::Valid
        } else {
            TokenState::Expired
        }
    }

    /// Returns `true` if the access token has expired.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.state_at(Utc::now()) == TokenState::Expired
    }

    /// Replaces the access token and expiry with the result of a refresh
    /// performed at `now`. The refresh token and creation time are kept.
    pub fn apply_refresh(&mut self, response: &TokenResponse, now: DateTime<Utc>) {
        self.access_token.clone_from(&response.access_token);
        self.expiry_utc = calculate_expiry_utc(now, response.expires_in);
    }
}

// Verify Credential is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Credential>();
};
