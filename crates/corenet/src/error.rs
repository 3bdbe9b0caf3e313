//! Error types for corenet
//!
//! Every failure a request can run into ends up as one of these variants.
//! Non-2xx responses are not errors at the client layer; they only become
//! [`Error::Status`] once a repository reduces the response.

use crate::http::JsonCodec;
use thiserror::Error;
use tracing::debug;

/// Result type alias for corenet operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for corenet.
#[derive(Debug, Error)]
pub enum Error {
    /// The server answered with a non-success status.
    ///
    /// Displays as the bare message so observers can show it directly.
    #[error("{message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Message taken from the body's `message` field, or the raw body
        message: String,
    },

    /// Network or connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The configured request timeout elapsed.
    #[error("Request timed out")]
    Timeout,

    /// A successful response body did not match the expected type.
    #[error("Failed to decode response body: {0}")]
    Decode(String),

    /// A request body could not be encoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP client configuration or initialization error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// A caller-supplied mapping function failed.
    #[error("Mapping failed: {0}")]
    Mapping(String),

    /// Other errors not covered by specific variants.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Build a [`Error::Status`] from a non-success response.
    ///
    /// The message is the top-level `message` field when the body is a JSON
    /// object carrying a primitive there; otherwise it is the raw body text.
    /// The body is parsed with `codec`, so a lenient codec also reads JSON5
    /// error bodies.
    ///
    /// ```rust
    /// use corenet::{Error, http::JsonCodec};
    ///
    /// let codec = JsonCodec::lenient();
    ///
    /// let err = Error::from_response(404, r#"{"message":"not found"}"#, codec);
    /// assert_eq!(err.to_string(), "not found");
    ///
    /// let err = Error::from_response(400, "{message: 'invalid phone number'}", codec);
    /// assert_eq!(err.to_string(), "invalid phone number");
    ///
    /// let err = Error::from_response(500, "internal error", codec);
    /// assert_eq!(err.to_string(), "internal error");
    /// ```
    pub fn from_response(status: u16, body: &str, codec: JsonCodec) -> Self {
        Error::Status {
            status,
            message: extract_message(body, codec),
        }
    }

    /// Wrap a failure from a caller's mapping function.
    pub fn mapping(reason: impl std::fmt::Display) -> Self {
        Error::Mapping(reason.to_string())
    }

    /// Status code for [`Error::Status`], `None` for everything else.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `true` when the request never produced a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Connection(_) | Error::Timeout)
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else if err.is_builder() {
            Error::HttpClient(err.to_string())
        } else {
            Error::Connection(err.to_string())
        }
    }
}

fn extract_message(body: &str, codec: JsonCodec) -> String {
    match message_field(body, codec) {
        Ok(message) => message,
        Err(reason) => {
            debug!(reason = %reason, "Error body has no usable message, using raw text");
            body.to_string()
        }
    }
}

fn message_field(body: &str, codec: JsonCodec) -> std::result::Result<String, String> {
    let value: serde_json::Value = codec
        .decode(body.as_bytes())
        .map_err(|e| e.to_string())?;
    let object = value
        .as_object()
        .ok_or_else(|| "body is not a JSON object".to_string())?;

    match object.get("message") {
        Some(serde_json::Value::String(message)) => Ok(message.clone()),
        Some(serde_json::Value::Number(number)) => Ok(number.to_string()),
        Some(serde_json::Value::Bool(flag)) => Ok(flag.to_string()),
        Some(serde_json::Value::Null) => Ok("null".to_string()),
        None => Err("no message field".to_string()),
        Some(_) => Err("message field is not a primitive".to_string()),
    }
}
