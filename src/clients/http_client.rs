//! HTTP transport for the accounts service and the Web API.
//!
//! This module provides the [`HttpClient`] type, which executes a
//! [`RequestDescriptor`] and either returns the parsed response or a
//! classified [`ApiError`].

use std::collections::HashMap;

use crate::clients::errors::{classify_response, classify_transport_error, ApiError};
use crate::clients::http_request::{DataType, HttpMethod, RequestDescriptor};
use crate::clients::http_response::HttpResponse;
use crate::config::SpotifyConfig;

/// Crate version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Executes request descriptors against the network.
///
/// The client:
/// - adds `User-Agent` and `Accept` headers unless the descriptor sets them
/// - encodes body parameters as JSON, or as a form when the descriptor's
///   `Content-Type` asks for it
/// - classifies every failure into an [`ApiError`]
///
/// It never retries. `HttpClient` is cheap to clone and `Send + Sync`.
///
/// # Example
///
/// ```rust,ignore
/// use spotify_api::clients::{HttpClient, HttpMethod, RequestDescriptor};
///
/// let http = HttpClient::new(&config)?;
/// let request = RequestDescriptor::api(config.api_endpoint(), &access_token)?
///     .method(HttpMethod::Get)
///     .path("/v1/me")
///     .build();
///
/// let response = http.execute(&request).await?;
/// println!("Signed in as {}", response.body["display_name"]);
/// ```
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new transport using the timeout and user agent prefix from
    /// `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Setup`] if the underlying HTTP client cannot be
    /// constructed (e.g., TLS initialization failure).
    pub fn new(config: &SpotifyConfig) -> Result<Self, ApiError> {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}Spotify API Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| ApiError::Setup {
            reason: format!("failed to create HTTP client: {e}"),
        })?;

        Ok(Self {
            client,
            default_headers,
        })
    }

    /// Returns the headers added to every request.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends the described request.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Setup`] if the URL cannot be assembled or the request
    ///   cannot be built
    /// - [`ApiError::Timeout`] if the request was sent but no response arrived
    /// - [`ApiError::Auth`], [`ApiError::WebApi`] or [`ApiError::GenericApi`]
    ///   for non-2xx responses, depending on the body's `error` field
    /// - [`ApiError::Transport`] for any other HTTP library failure
    pub async fn execute(&self, request: &RequestDescriptor) -> Result<HttpResponse, ApiError> {
        let url = request.url()?;
        let method = request.method();

        let mut req_builder = match method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
            HttpMethod::Put => self.client.put(&url),
            HttpMethod::Delete => self.client.delete(&url),
        };

        for (key, value) in &self.default_headers {
            if request.header(key).is_none() {
                req_builder = req_builder.header(key, value);
            }
        }
        for (key, value) in request.headers() {
            req_builder = req_builder.header(key, value);
        }

        if let Some(body) = request.body_parameters() {
            req_builder = match request.body_type() {
                DataType::Form => req_builder.form(&form_pairs(body)?),
                DataType::Json if request.header("content-type").is_some() => {
                    req_builder.body(body.to_string())
                }
                DataType::Json => req_builder
                    .header("Content-Type", DataType::Json.as_content_type())
                    .body(body.to_string()),
            };
        }

        tracing::debug!(%method, %url, "sending request");
        let res = req_builder
            .send()
            .await
            .map_err(|e| classify_transport_error(e, &url))?;

        let code = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res
            .text()
            .await
            .map_err(|e| classify_transport_error(e, &url))?;
        tracing::debug!(%method, %url, status = code, "received response");

        let body = if body_text.trim().is_empty() {
            serde_json::json!({})
        } else {
            serde_json::from_str(&body_text)
                .unwrap_or_else(|_| serde_json::json!({ "raw_body": body_text }))
        };

        let response = HttpResponse::new(code, res_headers, body);
        if response.is_ok() {
            Ok(response)
        } else {
            Err(classify_response(code, response.headers, response.body))
        }
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

/// Flattens body parameters into form pairs. Null values are skipped.
fn form_pairs(body: &serde_json::Value) -> Result<Vec<(String, String)>, ApiError> {
    let serde_json::Value::Object(map) = body else {
        return Err(ApiError::Setup {
            reason: "form bodies must be objects".to_string(),
        });
    };

    Ok(map
        .iter()
        .filter_map(|(key, value)| {
            let value = match value {
                serde_json::Value::Null => return None,
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Some((key.clone(), value))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientId, ClientSecret};
    use serde_json::json;

    fn create_test_config(prefix: Option<&str>) -> SpotifyConfig {
        let mut builder = SpotifyConfig::builder()
            .client_id(ClientId::new("test-id").unwrap())
            .client_secret(ClientSecret::new("test-secret").unwrap());
        if let Some(prefix) = prefix {
            builder = builder.user_agent_prefix(prefix);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_user_agent_header_format() {
        let client = HttpClient::new(&create_test_config(None)).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.contains("Spotify API Library v"));
        assert!(user_agent.contains("Rust"));
    }

    #[test]
    fn test_user_agent_with_prefix() {
        let client = HttpClient::new(&create_test_config(Some("MyApp/1.0"))).unwrap();

        let user_agent = client.default_headers().get("User-Agent").unwrap();
        assert!(user_agent.starts_with("MyApp/1.0 | "));
    }

    #[test]
    fn test_accept_header_is_json() {
        let client = HttpClient::new(&create_test_config(None)).unwrap();
        assert_eq!(
            client.default_headers().get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_form_pairs_flatten_scalars_and_skip_nulls() {
        let pairs = form_pairs(&json!({
            "grant_type": "refresh_token",
            "refresh_token": "abc",
            "expiring": 1,
            "unused": null,
        }))
        .unwrap();

        assert_eq!(pairs.len(), 3);
        assert!(pairs.contains(&("grant_type".to_string(), "refresh_token".to_string())));
        assert!(pairs.contains(&("expiring".to_string(), "1".to_string())));
    }

    #[test]
    fn test_form_pairs_reject_non_objects() {
        assert!(matches!(form_pairs(&json!("x")), Err(ApiError::Setup { .. })));
    }

    #[tokio::test]
    async fn test_execute_without_endpoint_is_setup_error() {
        let client = HttpClient::new(&create_test_config(None)).unwrap();
        let request = RequestDescriptor::builder().path("/v1/me").build();

        let result = client.execute(&request).await;
        assert!(matches!(result, Err(ApiError::Setup { .. })));
    }

    #[test]
    fn test_client_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpClient>();
    }
}
