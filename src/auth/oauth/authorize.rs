//! Authorization URL generation.
//!
//! The first step of the authorization-code flow: the user is redirected to
//! the accounts service's `/authorize` page, signs in, and is sent back to
//! the configured redirect URI with a `code` and the `state` generated here.

use serde_json::json;

use crate::auth::oauth::state::StateParam;
use crate::clients::{ApiError, RequestDescriptor};
use crate::config::SpotifyConfig;

/// Result of starting the authorization flow.
///
/// The `state` value **must** be stored by the application and compared
/// with the callback's `state` query parameter.
#[derive(Clone, Debug)]
pub struct AuthorizationRequest {
    /// URL to redirect the user to.
    pub url: String,
    /// State to verify on the callback.
    pub state: StateParam,
}

/// Builds the `/authorize` URL for `state`.
///
/// The URL carries `response_type=code`, the client ID, the redirect URI,
/// the configured scopes (space-joined) and the state.
///
/// # Errors
///
/// Returns [`ApiError::Setup`] if no redirect URI is configured.
///
/// # Example
///
/// ```rust
/// use spotify_api::auth::oauth::{create_authorize_url, StateParam};
/// use spotify_api::{ClientId, ClientSecret, RedirectUri, SpotifyConfig};
///
/// let config = SpotifyConfig::builder()
///     .client_id(ClientId::new("abc").unwrap())
///     .client_secret(ClientSecret::new("secret").unwrap())
///     .redirect_uri(RedirectUri::new("http://localhost:3000/callback").unwrap())
///     .scopes("user-read-email user-library-read".parse().unwrap())
///     .build()
///     .unwrap();
///
/// let url = create_authorize_url(&config, &StateParam::from_raw("xyz")).unwrap();
/// assert_eq!(
///     url,
///     "https://accounts.spotify.com/authorize?client_id=abc\
///      &redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fcallback\
///      &response_type=code&scope=user-read-email%20user-library-read&state=xyz"
/// );
/// ```
pub fn create_authorize_url(config: &SpotifyConfig, state: &StateParam) -> Result<String, ApiError> {
    let redirect_uri = config.redirect_uri().ok_or_else(|| ApiError::Setup {
        reason: "a redirect URI is required to build the authorize URL".to_string(),
    })?;

    RequestDescriptor::auth(config.accounts_endpoint())
        .path("/authorize")
        .query_params(json!({
            "response_type": "code",
            "client_id": config.client_id().as_ref(),
            "redirect_uri": redirect_uri.as_ref(),
            "scope": config.scopes().to_string(),
            "state": state.as_ref(),
        }))
        .build()
        .url()
}

/// Generates a fresh [`StateParam`] and the matching authorize URL.
///
/// # Errors
///
/// Returns [`ApiError::Setup`] if no redirect URI is configured.
pub fn begin_authorization(config: &SpotifyConfig) -> Result<AuthorizationRequest, ApiError> {
    let state = StateParam::new();
    let url = create_authorize_url(config, &state)?;
    Ok(AuthorizationRequest { url, state })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientId, ClientSecret, RedirectUri};

    fn config(redirect: bool) -> SpotifyConfig {
        let mut builder = SpotifyConfig::builder()
            .client_id(ClientId::new("client-123").unwrap())
            .client_secret(ClientSecret::new("secret").unwrap())
            .scopes("streaming,user-read-email".parse().unwrap());
        if redirect {
            builder = builder.redirect_uri(RedirectUri::new("https://app.example.com/cb").unwrap());
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_authorize_url_contains_all_parameters() {
        let url = create_authorize_url(&config(true), &StateParam::from_raw("s1")).unwrap();

        assert!(url.starts_with("https://accounts.spotify.com/authorize?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("redirect_uri=https%3A%2F%2Fapp.example.com%2Fcb"));
        assert!(url.contains("scope=streaming%20user-read-email"));
        assert!(url.contains("state=s1"));
    }

    #[test]
    fn test_missing_redirect_uri_is_setup_error() {
        let result = create_authorize_url(&config(false), &StateParam::new());
        assert!(matches!(result, Err(ApiError::Setup { .. })));
    }

    #[test]
    fn test_begin_authorization_embeds_generated_state() {
        let request = begin_authorization(&config(true)).unwrap();
        assert!(request
            .url
            .ends_with(&format!("state={}", request.state.as_ref())));
    }
}
