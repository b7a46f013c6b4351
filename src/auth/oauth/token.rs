//! Token grants against the accounts service.
//!
//! Both grants `POST /api/token` with a form-encoded body and the client
//! credentials in an HTTP Basic `Authorization` header:
//!
//! - [`authorization_code_grant`] exchanges the callback's `code` for a new
//!   [`Credential`]
//! - [`refresh_access_token`] exchanges a refresh token for a new access
//!   token
//!
//! Failures surface as [`ApiError::Auth`], the accounts service's
//! `{error, error_description}` body normalized to `{error: {status, message}}`.

use chrono::Utc;
use serde::Serialize;

use crate::auth::session::{Credential, TokenResponse};
use crate::clients::{
    ApiError, DataType, ErrorPayload, HttpClient, HttpMethod, HttpResponse, RequestDescriptor,
};
use crate::config::SpotifyConfig;

/// Path of the token endpoint on the accounts service.
const TOKEN_PATH: &str = "/api/token";

/// Grant type for the authorization-code exchange.
const AUTHORIZATION_CODE_GRANT_TYPE: &str = "authorization_code";

/// Grant type for refresh requests.
const REFRESH_TOKEN_GRANT_TYPE: &str = "refresh_token";

/// Request body for the authorization-code exchange.
#[derive(Debug, Serialize)]
struct AuthorizationCodeRequest<'a> {
    grant_type: &'a str,
    code: &'a str,
    redirect_uri: &'a str,
}

/// Request body for token refresh.
#[derive(Debug, Serialize)]
struct TokenRefreshRequest<'a> {
    grant_type: &'a str,
    refresh_token: &'a str,
    client_id: &'a str,
}

/// Exchanges an authorization code for a [`Credential`].
///
/// The credential's `creation_utc` is the moment the response was received
/// and its `expiry_utc` is 90% of the declared lifespan from then.
///
/// # Errors
///
/// - [`ApiError::Setup`] if `code` is empty or no redirect URI is configured
/// - [`ApiError::Auth`] if the accounts service rejects the code
/// - [`ApiError::GenericApi`] if the response carries no refresh token or
///   cannot be parsed
///
/// # Example
///
/// ```rust,ignore
/// use spotify_api::auth::oauth::authorization_code_grant;
///
/// // `code` and `state` come from the callback's query string
/// if !stored_state.matches(&state) {
///     return Err("state mismatch".into());
/// }
/// let credential = authorization_code_grant(&config, &http, &code).await?;
/// store.set(&session_id, credential);
/// ```
pub async fn authorization_code_grant(
    config: &SpotifyConfig,
    http: &HttpClient,
    code: &str,
) -> Result<Credential, ApiError> {
    if code.is_empty() {
        return Err(ApiError::Setup {
            reason: "an authorization code is required".to_string(),
        });
    }
    let redirect_uri = config.redirect_uri().ok_or_else(|| ApiError::Setup {
        reason: "a redirect URI is required for the authorization code grant".to_string(),
    })?;

    let request_body = AuthorizationCodeRequest {
        grant_type: AUTHORIZATION_CODE_GRANT_TYPE,
        code,
        redirect_uri: redirect_uri.as_ref(),
    };
    let (response, token) = request_token(config, http, &request_body).await?;

    Credential::from_token_response(&token, Utc::now()).ok_or_else(|| {
        ApiError::GenericApi(ErrorPayload {
            status: response.code,
            message: "token response did not include a refresh token".to_string(),
            headers: response.headers,
            body: response.body,
        })
    })
}

/// Exchanges a refresh token for a new access token.
///
/// # Errors
///
/// - [`ApiError::Setup`] if `refresh_token` is empty
/// - [`ApiError::Auth`] if the accounts service rejects the refresh token
/// - [`ApiError::GenericApi`] if the response cannot be parsed
pub async fn refresh_access_token(
    config: &SpotifyConfig,
    http: &HttpClient,
    refresh_token: &str,
) -> Result<TokenResponse, ApiError> {
    if refresh_token.is_empty() {
        return Err(ApiError::Setup {
            reason: "a refresh token is required".to_string(),
        });
    }

    let request_body = TokenRefreshRequest {
        grant_type: REFRESH_TOKEN_GRANT_TYPE,
        refresh_token,
        client_id: config.client_id().as_ref(),
    };
    let (_, token) = request_token(config, http, &request_body).await?;
    Ok(token)
}

async fn request_token(
    config: &SpotifyConfig,
    http: &HttpClient,
    request_body: &impl Serialize,
) -> Result<(HttpResponse, TokenResponse), ApiError> {
    let body = serde_json::to_value(request_body).map_err(|e| ApiError::Setup {
        reason: format!("failed to encode token request: {e}"),
    })?;

    let request = RequestDescriptor::auth(config.accounts_endpoint())
        .method(HttpMethod::Post)
        .path(TOKEN_PATH)
        .content_type(DataType::Form)
        .basic_auth(config.client_id().as_ref(), config.client_secret().as_ref())
        .body_params(body)
        .build();

    let response = http.execute(&request).await?;
    match serde_json::from_value::<TokenResponse>(response.body.clone()) {
        Ok(token) => Ok((response, token)),
        Err(e) => Err(ApiError::GenericApi(ErrorPayload {
            status: response.code,
            message: format!("failed to parse token response: {e}"),
            headers: response.headers,
            body: response.body,
        })),
    }
}
