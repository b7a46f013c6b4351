//! HTTP layer for the accounts service and the Web API.
//!
//! # Overview
//!
//! - [`RequestDescriptor`]: an immutable description of one call, built with
//!   [`RequestDescriptorBuilder`] by merging partial fragments
//! - [`HttpClient`]: the transport that executes a descriptor
//! - [`HttpResponse`]: a parsed 2xx response
//! - [`ApiError`]: every failure, classified once by [`classify_response`] or
//!   [`classify_transport_error`]
//!
//! # Example
//!
//! ```rust,ignore
//! use spotify_api::clients::{HttpClient, HttpMethod, RequestDescriptor};
//!
//! let http = HttpClient::new(&config)?;
//! let request = RequestDescriptor::api(config.api_endpoint(), &access_token)?
//!     .method(HttpMethod::Get)
//!     .path("/v1/me/tracks")
//!     .query_params(serde_json::json!({"limit": 50, "offset": 0}))
//!     .build();
//!
//! let response = http.execute(&request).await?;
//! ```
//!
//! # Retry Behavior
//!
//! The transport never retries. Rate-limited responses surface as
//! [`ApiError::WebApi`] with the `retry-after` header kept in the payload.

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{
    classify_response, classify_transport_error, ApiError, ErrorKind, ErrorPayload,
    UNHANDLED_ERROR_MESSAGE,
};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{DataType, HttpMethod, RequestDescriptor, RequestDescriptorBuilder};
pub use http_response::HttpResponse;
