//! Classified errors for calls to the accounts service and the Web API.
//!
//! Every failed call is classified exactly once into an [`ApiError`]:
//!
//! - [`ApiError::Timeout`]: the request was sent but no response arrived
//! - [`ApiError::Setup`]: the request could not be built, nothing was sent
//! - [`ApiError::Auth`]: the accounts service rejected a grant (`error` is a string)
//! - [`ApiError::WebApi`]: the Web API rejected a call (`error` is an object)
//! - [`ApiError::GenericApi`]: a non-2xx response of any other shape
//! - [`ApiError::Transport`]: any other failure inside the HTTP library
//!
//! Errors are never retried by the client.
//!
//! # Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use serde_json::json;
//! use spotify_api::clients::{classify_response, ErrorKind};
//!
//! let error = classify_response(400, HashMap::new(), json!({
//!     "error": "invalid_grant",
//!     "error_description": "Invalid refresh token",
//! }));
//! assert_eq!(error.kind(), ErrorKind::Auth);
//! assert_eq!(
//!     error.payload().unwrap().body,
//!     json!({"error": {"status": 400, "message": "Invalid refresh token"}})
//! );
//! ```

use std::collections::HashMap;
use std::fmt;

use serde_json::{json, Value};
use thiserror::Error;

/// Message used for non-2xx responses whose body has no recognizable error.
pub const UNHANDLED_ERROR_MESSAGE: &str = "Unhandled error.";

/// Discriminant of an [`ApiError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No response was received for a sent request.
    Timeout,
    /// The request could not be built.
    Setup,
    /// The accounts service rejected credentials or a grant.
    Auth,
    /// The Web API rejected a call.
    WebApi,
    /// A non-2xx response with an unrecognized body.
    GenericApi,
    /// An unclassified failure inside the HTTP library.
    Transport,
}

/// Status, message and raw response data carried by response-level errors.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorPayload {
    /// The HTTP status code of the response.
    pub status: u16,
    /// Human-readable message extracted from the body.
    pub message: String,
    /// Response headers (lowercased names).
    pub headers: HashMap<String, Vec<String>>,
    /// Response body. For [`ApiError::Auth`] this is normalized to
    /// `{"error": {"status", "message"}}`.
    pub body: Value,
}

impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (status {})", self.message, self.status)
    }
}

/// A classified failure of a call to Spotify.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request was sent but no response was received.
    #[error("A timeout occurred whilst communicating with Spotify's Web API ({url}).")]
    Timeout {
        /// The URL the request was sent to.
        url: String,
    },

    /// The request could not be built; nothing was sent.
    #[error("An error occurred whilst setting up the API request: {reason}.")]
    Setup {
        /// What was wrong with the request.
        reason: String,
    },

    /// The accounts service rejected credentials or a grant.
    #[error("An authentication error occurred whilst communicating with Spotify's Web API: {0}")]
    Auth(ErrorPayload),

    /// The Web API rejected a call.
    #[error("An error occurred whilst communicating with Spotify's Web API: {0}")]
    WebApi(ErrorPayload),

    /// A non-2xx response whose body carried no recognizable error.
    #[error("{0}")]
    GenericApi(ErrorPayload),

    /// Any other failure inside the HTTP library.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// Returns the discriminant of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Setup { .. } => ErrorKind::Setup,
            Self::Auth(_) => ErrorKind::Auth,
            Self::WebApi(_) => ErrorKind::WebApi,
            Self::GenericApi(_) => ErrorKind::GenericApi,
            Self::Transport(_) => ErrorKind::Transport,
        }
    }

    /// Returns the response payload for response-level errors.
    #[must_use]
    pub const fn payload(&self) -> Option<&ErrorPayload> {
        match self {
            Self::Auth(payload) | Self::WebApi(payload) | Self::GenericApi(payload) => {
                Some(payload)
            }
            _ => None,
        }
    }

    /// Returns the HTTP status of the failed response, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(error) => error.status().map(|status| status.as_u16()),
            _ => self.payload().map(|payload| payload.status),
        }
    }

    /// The status a server fronting this client should answer with.
    ///
    /// Response-level errors keep the upstream status, a missing response
    /// maps to 504 and everything else to 500.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Timeout { .. } => 504,
            Self::Setup { .. } | Self::Transport(_) => 500,
            _ => self.status().unwrap_or(500),
        }
    }

    /// The message a server fronting this client should answer with:
    /// `body.error.message` when present, otherwise the error's own message.
    #[must_use]
    pub fn public_message(&self) -> String {
        self.payload()
            .and_then(|payload| payload.body.pointer("/error/message"))
            .and_then(Value::as_str)
            .map_or_else(|| self.to_string(), String::from)
    }
}

/// Classifies a non-2xx response by the shape of its `error` field.
///
/// A string `error` is the accounts service's failure shape and becomes
/// [`ApiError::Auth`], with the body normalized to the Web API's
/// `{"error": {"status", "message"}}` shape. An object `error` becomes
/// [`ApiError::WebApi`]. Anything else becomes [`ApiError::GenericApi`].
#[must_use]
pub fn classify_response(
    status: u16,
    headers: HashMap<String, Vec<String>>,
    body: Value,
) -> ApiError {
    match body.get("error") {
        Some(Value::String(code)) => {
            let message = body
                .get("error_description")
                .and_then(Value::as_str)
                .unwrap_or(code.as_str())
                .to_string();
            let normalized = json!({ "error": { "status": status, "message": message } });
            tracing::warn!(status, error = %code, "accounts service rejected request");
            ApiError::Auth(ErrorPayload {
                status,
                message,
                headers,
                body: normalized,
            })
        }
        Some(Value::Object(error)) => {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            tracing::warn!(status, %message, "Web API rejected request");
            ApiError::WebApi(ErrorPayload {
                status,
                message,
                headers,
                body,
            })
        }
        _ => {
            tracing::warn!(status, "unrecognized error response");
            ApiError::GenericApi(ErrorPayload {
                status,
                message: UNHANDLED_ERROR_MESSAGE.to_string(),
                headers,
                body,
            })
        }
    }
}

/// Classifies a failure raised by the HTTP library before a response was
/// received.
#[must_use]
pub fn classify_transport_error(error: reqwest::Error, url: &str) -> ApiError {
    if error.is_builder() {
        ApiError::Setup {
            reason: error.to_string(),
        }
    } else if error.is_timeout() || error.is_connect() || error.is_request() {
        tracing::warn!(%url, %error, "no response received");
        ApiError::Timeout {
            url: url.to_string(),
        }
    } else {
        ApiError::Transport(error)
    }
}
