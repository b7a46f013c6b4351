//! Request descriptors for the accounts service and the Web API.
//!
//! A [`RequestDescriptor`] describes one HTTP call: method, scheme, host,
//! port, path, headers, query parameters and body parameters. It is built
//! with [`RequestDescriptorBuilder`], executed once by the
//! [`HttpClient`](crate::clients::HttpClient) and then dropped.
//!
//! # Merge semantics
//!
//! Headers, query parameters and body parameters may be set by several
//! builder calls. Each call applies one fragment to the existing value:
//!
//! - a non-empty object is merged key by key into an existing object;
//! - a string, number, boolean or array replaces the existing value;
//! - `null`, `""`, `{}` and `[]` leave the existing value untouched.
//!
//! An object applied over a value that was previously replaced by a scalar
//! replaces it rather than merging into it.

use std::collections::BTreeMap;
use std::fmt;

use base64::prelude::*;
use serde_json::{Map, Value};

use crate::clients::errors::ApiError;
use crate::config::Endpoint;

/// HTTP methods used by the Web API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    #[default]
    Get,
    /// HTTP POST method for creating resources and token grants.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// Content type for request bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    /// JSON content type (`application/json`).
    Json,
    /// Form content type (`application/x-www-form-urlencoded`), used by the
    /// accounts service token endpoint.
    Form,
}

impl DataType {
    /// Returns the MIME type string for this data type.
    #[must_use]
    pub const fn as_content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Form => "application/x-www-form-urlencoded",
        }
    }
}

/// An immutable description of one HTTP call.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use spotify_api::clients::{HttpMethod, RequestDescriptor};
/// use spotify_api::Endpoint;
///
/// let request = RequestDescriptor::api(&Endpoint::api(), "token")
///     .unwrap()
///     .method(HttpMethod::Get)
///     .path("/v1/me/tracks")
///     .query_params(json!({"limit": 50, "offset": 0}))
///     .query_params(json!({"market": null}))
///     .build();
///
/// assert_eq!(
///     request.url().unwrap(),
///     "https://api.spotify.com/v1/me/tracks?limit=50&offset=0"
/// );
/// assert_eq!(request.header("authorization"), Some("Bearer token"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestDescriptor {
    method: HttpMethod,
    scheme: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    path: Option<String>,
    headers: BTreeMap<String, String>,
    query_parameters: Option<Value>,
    body_parameters: Option<Value>,
}

impl RequestDescriptor {
    /// Creates an empty builder.
    #[must_use]
    pub fn builder() -> RequestDescriptorBuilder {
        RequestDescriptorBuilder::default()
    }

    /// Creates a builder targeting the accounts service.
    #[must_use]
    pub fn auth(endpoint: &Endpoint) -> RequestDescriptorBuilder {
        Self::builder().endpoint(endpoint)
    }

    /// Creates a builder targeting the Web API with a bearer token already
    /// set.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Setup`] if `access_token` is empty. Every
    /// authenticated call goes through this constructor, so no descriptor
    /// for the Web API can exist without a token.
    pub fn api(endpoint: &Endpoint, access_token: &str) -> Result<RequestDescriptorBuilder, ApiError> {
        if access_token.trim().is_empty() {
            return Err(ApiError::Setup {
                reason: "a request sent to the Web API must include an access token".to_string(),
            });
        }
        Ok(Self::builder().endpoint(endpoint).bearer_auth(access_token))
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the scheme, if set.
    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Returns the host, if set.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Returns the port, if set.
    #[must_use]
    pub const fn port(&self) -> Option<u16> {
        self.port
    }

    /// Returns the path, if set.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Returns all headers.
    #[must_use]
    pub const fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Returns a header value, matching the name case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the query parameters, if any were set.
    #[must_use]
    pub const fn query_parameters(&self) -> Option<&Value> {
        self.query_parameters.as_ref()
    }

    /// Returns the body parameters, if any were set.
    #[must_use]
    pub const fn body_parameters(&self) -> Option<&Value> {
        self.body_parameters.as_ref()
    }

    /// Returns the body encoding implied by the `Content-Type` header.
    /// Bodies are sent as JSON unless a form content type was set.
    #[must_use]
    pub fn body_type(&self) -> DataType {
        match self.header("content-type") {
            Some(value) if value.starts_with(DataType::Form.as_content_type()) => DataType::Form,
            _ => DataType::Json,
        }
    }

    /// Assembles `scheme://host[:port]path`. The port is omitted when it is
    /// the default for the scheme.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Setup`] if the scheme, host or port is missing.
    pub fn uri(&self) -> Result<String, ApiError> {
        let (Some(scheme), Some(host), Some(port)) = (&self.scheme, &self.host, self.port) else {
            return Err(ApiError::Setup {
                reason: "missing components necessary to construct URI".to_string(),
            });
        };

        let mut uri = format!("{scheme}://{host}");
        let default_port = match scheme.as_str() {
            "http" => Some(80),
            "https" => Some(443),
            _ => None,
        };
        if default_port != Some(port) {
            uri.push_str(&format!(":{port}"));
        }
        if let Some(path) = &self.path {
            uri.push_str(path);
        }
        Ok(uri)
    }

    /// Serializes the query parameters, without the leading `?`.
    ///
    /// Keys are emitted in sorted order and parameters whose value is `null`
    /// are omitted. Array values are joined with commas.
    #[must_use]
    pub fn query_string(&self) -> String {
        match &self.query_parameters {
            None | Some(Value::Null) => String::new(),
            Some(Value::Object(map)) => {
                let mut pairs: Vec<(&String, String)> = map
                    .iter()
                    .filter_map(|(key, value)| format_query_value(value).map(|value| (key, value)))
                    .collect();
                pairs.sort_by(|a, b| a.0.cmp(b.0));
                pairs
                    .into_iter()
                    .map(|(key, value)| format!("{}={value}", urlencoding::encode(key)))
                    .collect::<Vec<_>>()
                    .join("&")
            }
            Some(other) => format_query_value(other).unwrap_or_default(),
        }
    }

    /// Assembles the full URL, including the query string when non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Setup`] if the scheme, host or port is missing.
    pub fn url(&self) -> Result<String, ApiError> {
        let uri = self.uri()?;
        let query = self.query_string();
        if query.is_empty() {
            Ok(uri)
        } else {
            Ok(format!("{uri}?{query}"))
        }
    }
}

fn format_query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(urlencoding::encode(s).into_owned()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(format_query_value)
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Object(_) => Some(urlencoding::encode(&value.to_string()).into_owned()),
    }
}

/// Applies one parameter fragment to an existing value.
fn merge_params(existing: Option<Value>, fragment: Value) -> Option<Value> {
    let is_empty = match &fragment {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(_) | Value::Bool(_) => false,
    };
    if is_empty {
        return existing;
    }

    match (existing, fragment) {
        (Some(Value::Object(mut current)), Value::Object(incoming)) => {
            current.extend(incoming);
            Some(Value::Object(current))
        }
        (_, fragment) => Some(fragment),
    }
}

/// Builder for [`RequestDescriptor`].
///
/// Every setter takes `self` by value and returns it for chaining.
#[derive(Clone, Debug, Default)]
pub struct RequestDescriptorBuilder {
    request: RequestDescriptor,
}

impl RequestDescriptorBuilder {
    /// Sets the HTTP method.
    #[must_use]
    pub const fn method(mut self, method: HttpMethod) -> Self {
        self.request.method = method;
        self
    }

    /// Sets the scheme.
    #[must_use]
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.request.scheme = Some(scheme.into());
        self
    }

    /// Sets the host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.request.host = Some(host.into());
        self
    }

    /// Sets the port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.request.port = Some(port);
        self
    }

    /// Sets scheme, host and port from an endpoint.
    #[must_use]
    pub fn endpoint(self, endpoint: &Endpoint) -> Self {
        self.scheme(endpoint.scheme())
            .host(endpoint.host())
            .port(endpoint.port())
    }

    /// Sets the path.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.request.path = Some(path.into());
        self
    }

    /// Merges a fragment of headers. Header names are unique regardless of
    /// case: a new value replaces any existing header with the same name.
    #[must_use]
    pub fn headers<I, K, V>(mut self, fragment: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in fragment {
            let key = key.into();
            self.request
                .headers
                .retain(|existing, _| !existing.eq_ignore_ascii_case(&key));
            self.request.headers.insert(key, value.into());
        }
        self
    }

    /// Sets a single header.
    #[must_use]
    pub fn header(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers([(key.into(), value.into())])
    }

    /// Sets the `Authorization: Bearer <token>` header.
    #[must_use]
    pub fn bearer_auth(self, access_token: &str) -> Self {
        self.header("Authorization", format!("Bearer {access_token}"))
    }

    /// Sets the `Authorization: Basic <base64(id:secret)>` header.
    #[must_use]
    pub fn basic_auth(self, client_id: &str, client_secret: &str) -> Self {
        let credentials = BASE64_STANDARD.encode(format!("{client_id}:{client_secret}"));
        self.header("Authorization", format!("Basic {credentials}"))
    }

    /// Sets the `Content-Type` header.
    #[must_use]
    pub fn content_type(self, data_type: DataType) -> Self {
        self.header("Content-Type", data_type.as_content_type())
    }

    /// Applies a query parameter fragment using the merge rules described in
    /// the [module documentation](self).
    #[must_use]
    pub fn query_params(mut self, fragment: impl Into<Value>) -> Self {
        self.request.query_parameters =
            merge_params(self.request.query_parameters.take(), fragment.into());
        self
    }

    /// Sets a single query parameter, merging it into the existing ones.
    #[must_use]
    pub fn query_param(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut fragment = Map::new();
        fragment.insert(key.into(), value.into());
        self.query_params(Value::Object(fragment))
    }

    /// Applies several query parameter fragments left to right, as if
    /// [`query_params`](Self::query_params) were chained once per fragment.
    #[must_use]
    pub fn query_fragments<I>(self, fragments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        fragments
            .into_iter()
            .fold(self, |builder, fragment| builder.query_params(fragment))
    }

    /// Applies a body parameter fragment using the merge rules described in
    /// the [module documentation](self).
    #[must_use]
    pub fn body_params(mut self, fragment: impl Into<Value>) -> Self {
        self.request.body_parameters =
            merge_params(self.request.body_parameters.take(), fragment.into());
        self
    }

    /// Applies several body parameter fragments left to right.
    #[must_use]
    pub fn body_fragments<I>(self, fragments: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        fragments
            .into_iter()
            .fold(self, |builder, fragment| builder.body_params(fragment))
    }

    /// Returns the finished descriptor.
    #[must_use]
    pub fn build(self) -> RequestDescriptor {
        self.request
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "GET");
        assert_eq!(HttpMethod::Post.to_string(), "POST");
        assert_eq!(HttpMethod::Put.to_string(), "PUT");
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }

    #[test]
    fn test_data_type_content_type() {
        assert_eq!(DataType::Json.as_content_type(), "application/json");
        assert_eq!(
            DataType::Form.as_content_type(),
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn test_object_fragments_merge() {
        let request = RequestDescriptor::builder()
            .query_params(json!({"a": 1}))
            .query_params(json!({"b": 2}))
            .build();
        assert_eq!(request.query_parameters(), Some(&json!({"a": 1, "b": 2})));
    }

    #[test]
    fn test_later_keys_override_earlier_keys() {
        let request = RequestDescriptor::builder()
            .body_params(json!({"a": 1, "b": 1}))
            .body_params(json!({"b": 2}))
            .build();
        assert_eq!(request.body_parameters(), Some(&json!({"a": 1, "b": 2})));
    }

    #[test]
    fn test_scalar_replaces_object() {
        let request = RequestDescriptor::builder()
            .query_params(json!({"a": 1}))
            .query_params("x")
            .build();
        assert_eq!(request.query_parameters(), Some(&json!("x")));
    }

    #[test]
    fn test_fragment_lists_apply_left_to_right() {
        let request = RequestDescriptor::builder()
            .query_fragments([json!({"a": 1}), json!({"b": 2}), json!({"a": 3})])
            .body_fragments([json!({"a": 1}), json!("x")])
            .build();
        assert_eq!(request.query_parameters(), Some(&json!({"a": 3, "b": 2})));
        assert_eq!(request.body_parameters(), Some(&json!("x")));
    }

    #[test]
    fn test_array_replaces_instead_of_concatenating() {
        let request = RequestDescriptor::builder()
            .body_params(json!(["a", "b"]))
            .body_params(json!(["c"]))
            .build();
        assert_eq!(request.body_parameters(), Some(&json!(["c"])));
    }

    #[test]
    fn test_object_after_scalar_replaces_rather_than_merging() {
        let request = RequestDescriptor::builder()
            .query_params(json!({"a": 1}))
            .query_params("x")
            .query_params(json!({"b": 2}))
            .build();
        assert_eq!(request.query_parameters(), Some(&json!({"b": 2})));
    }

    #[test]
    fn test_empty_fragments_leave_existing_untouched() {
        let request = RequestDescriptor::builder()
            .query_params(json!({"a": 1}))
            .query_params(json!({}))
            .query_params(Value::Null)
            .query_params("")
            .query_params(json!([]))
            .build();
        assert_eq!(request.query_parameters(), Some(&json!({"a": 1})));
    }

    #[test]
    fn test_empty_fragment_on_nothing_stays_nothing() {
        let request = RequestDescriptor::builder().query_params(json!({})).build();
        assert!(request.query_parameters().is_none());
        assert_eq!(request.query_string(), "");
    }

    #[test]
    fn test_headers_merge_case_insensitively() {
        let request = RequestDescriptor::builder()
            .header("Authorization", "Bearer a")
            .headers([("content-Type", "text/plain"), ("Accept", "application/json")])
            .header("Content-Type", "application/json")
            .build();

        assert_eq!(request.headers().len(), 3);
        assert_eq!(request.header("authorization"), Some("Bearer a"));
        assert_eq!(request.header("CONTENT-TYPE"), Some("application/json"));
    }

    #[test]
    fn test_null_query_values_are_omitted_from_url() {
        let request = RequestDescriptor::auth(&Endpoint::accounts())
            .path("/authorize")
            .query_params(json!({"state": null, "response_type": "code"}))
            .build();

        let url = request.url().unwrap();
        assert_eq!(url, "https://accounts.spotify.com/authorize?response_type=code");
        assert!(!url.contains("state"));
    }

    #[test]
    fn test_query_values_are_encoded_and_arrays_joined() {
        let request = RequestDescriptor::builder()
            .query_params(json!({"scope": "a b", "ids": ["1", "2"], "flag": true}))
            .build();
        assert_eq!(request.query_string(), "flag=true&ids=1,2&scope=a%20b");
    }

    #[test]
    fn test_uri_includes_non_default_port_only() {
        let default_port = RequestDescriptor::builder()
            .scheme("https")
            .host("api.spotify.com")
            .port(443)
            .path("/v1/me")
            .build();
        assert_eq!(default_port.uri().unwrap(), "https://api.spotify.com/v1/me");

        let custom_port = RequestDescriptor::builder()
            .scheme("http")
            .host("127.0.0.1")
            .port(8080)
            .path("/v1/me")
            .build();
        assert_eq!(custom_port.uri().unwrap(), "http://127.0.0.1:8080/v1/me");

        let http_on_443 = RequestDescriptor::builder()
            .scheme("http")
            .host("localhost")
            .port(443)
            .build();
        assert_eq!(http_on_443.uri().unwrap(), "http://localhost:443");
    }

    #[test]
    fn test_uri_requires_scheme_host_and_port() {
        let missing_port = RequestDescriptor::builder()
            .scheme("https")
            .host("api.spotify.com")
            .build();
        assert!(matches!(missing_port.uri(), Err(ApiError::Setup { .. })));

        let missing_host = RequestDescriptor::builder().scheme("https").port(443).build();
        assert!(matches!(missing_host.url(), Err(ApiError::Setup { .. })));
    }

    #[test]
    fn test_api_request_requires_token() {
        assert!(matches!(
            RequestDescriptor::api(&Endpoint::api(), ""),
            Err(ApiError::Setup { .. })
        ));

        let request = RequestDescriptor::api(&Endpoint::api(), "abc")
            .unwrap()
            .path("/v1/me")
            .build();
        assert_eq!(request.header("Authorization"), Some("Bearer abc"));
        assert_eq!(request.method(), HttpMethod::Get);
    }

    #[test]
    fn test_basic_auth_encodes_client_credentials() {
        let request = RequestDescriptor::auth(&Endpoint::accounts())
            .basic_auth("id", "secret")
            .build();
        assert_eq!(request.header("authorization"), Some("Basic aWQ6c2VjcmV0"));
    }

    #[test]
    fn test_body_type_follows_content_type_header() {
        let form = RequestDescriptor::builder().content_type(DataType::Form).build();
        assert_eq!(form.body_type(), DataType::Form);

        let json_body = RequestDescriptor::builder().build();
        assert_eq!(json_body.body_type(), DataType::Json);
    }
}
