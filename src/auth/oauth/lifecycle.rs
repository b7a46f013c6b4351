//! Refresh-before-use gate for stored credentials.
//!
//! A [`Credential`] is either [`TokenState::Valid`] or
//! [`TokenState::Expired`]. Every authenticated call first passes through
//! [`ensure_fresh_token`], which refreshes an expired credential in place and
//! leaves a valid one alone.

use chrono::{DateTime, Utc};

use crate::auth::oauth::token::refresh_access_token;
use crate::auth::session::{Credential, TokenState};
use crate::clients::{ApiError, HttpClient};
use crate::config::SpotifyConfig;

/// Refreshes `credential` if it has expired.
///
/// Returns `true` if a refresh happened. On success the access token and
/// expiry are replaced; the refresh token and creation time are kept.
///
/// # Errors
///
/// Returns the classified error of the refresh call. The credential is left
/// untouched, so the next call retries the refresh.
pub async fn ensure_fresh_token(
    config: &SpotifyConfig,
    http: &HttpClient,
    credential: &mut Credential,
) -> Result<bool, ApiError> {
    ensure_fresh_token_at(config, http, credential, Utc::now()).await
}

/// Same as [`ensure_fresh_token`], judging expiry and computing the new
/// expiry against `now`.
///
/// # Errors
///
/// Returns the classified error of the refresh call.
pub async fn ensure_fresh_token_at(
    config: &SpotifyConfig,
    http: &HttpClient,
    credential: &mut Credential,
    now: DateTime<Utc>,
) -> Result<bool, ApiError> {
    if credential.state_at(now) == TokenState::Valid {
        return Ok(false);
    }

    let token = refresh_access_token(config, http, &credential.refresh_token).await?;
    credential.apply_refresh(&token, now);
    tracing::info!(expiry_utc = %credential.expiry_utc, "access token refreshed");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientId, ClientSecret, Endpoint};
    use chrono::Duration;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> SpotifyConfig {
        SpotifyConfig::builder()
            .client_id(ClientId::new("client").unwrap())
            .client_secret(ClientSecret::new("secret").unwrap())
            .accounts_endpoint(Endpoint::parse(&server.uri()).unwrap())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_credential_is_not_refreshed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let http = HttpClient::new(&config).unwrap();
        let now = Utc::now();
        let mut credential = Credential::new("a", "r", now + Duration::minutes(5), now);
        let before = credential.clone();

        let refreshed = ensure_fresh_token_at(&config, &http, &mut credential, now)
            .await
            .unwrap();

        assert!(!refreshed);
        assert_eq!(credential, before);
    }

    #[tokio::test]
    async fn test_expired_credential_is_refreshed_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "fresh",
                "token_type": "Bearer",
                "expires_in": 3600,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = config_for(&server);
        let http = HttpClient::new(&config).unwrap();
        let now = Utc::now();
        let created = now - Duration::hours(1);
        let mut credential = Credential::new("stale", "r", now, created);

        let refreshed = ensure_fresh_token_at(&config, &http, &mut credential, now)
            .await
            .unwrap();

        assert!(refreshed);
        assert_eq!(credential.access_token, "fresh");
        assert_eq!(credential.expiry_utc, now + Duration::seconds(3240));
        assert_eq!(credential.refresh_token, "r");
        assert_eq!(credential.creation_utc, created);
    }

    #[tokio::test]
    async fn test_failed_refresh_leaves_credential_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Refresh token revoked",
            })))
            .mount(&server)
            .await;

        let config = config_for(&server);
        let http = HttpClient::new(&config).unwrap();
        let now = Utc::now();
        let mut credential = Credential::new("stale", "r", now - Duration::seconds(1), now);
        let before = credential.clone();

        let error = ensure_fresh_token_at(&config, &http, &mut credential, now)
            .await
            .unwrap_err();

        assert!(matches!(error, ApiError::Auth(_)));
        assert_eq!(credential, before);
    }
}
