//! JSON content negotiation
//!
//! Unknown fields are always ignored. In lenient mode a body that strict
//! JSON rejects gets a second chance through a JSON5 parser, which accepts
//! unquoted keys, single-quoted strings, trailing commas and comments.

use crate::error::{Error, Result};
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

/// Media type sent and expected by the client.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Encoder/decoder for request and response bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonCodec {
    lenient: bool,
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::lenient()
    }
}

impl JsonCodec {
    /// Codec that only accepts standard JSON.
    pub const fn strict() -> Self {
        Self { lenient: false }
    }

    /// Codec that falls back to JSON5 when strict parsing fails.
    pub const fn lenient() -> Self {
        Self { lenient: true }
    }

    /// Whether this codec falls back to JSON5.
    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    /// Serialize a request body.
    pub fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(Error::Serialization)
    }

    /// Deserialize a response body.
    ///
    /// An empty (or all-whitespace) body decodes as JSON `null`, so `()` and
    /// `Option<T>` targets accept `204 No Content` style responses.
    pub fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_slice(b"null").map_err(|e| Error::Decode(e.to_string()));
        }

        let strict_err = match serde_json::from_slice(body) {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !self.lenient {
            return Err(Error::Decode(strict_err.to_string()));
        }

        let text = std::str::from_utf8(body).map_err(|e| Error::Decode(e.to_string()))?;
        json5::from_str(text).map_err(|lenient_err| {
            debug!(
                strict = %strict_err,
                lenient = %lenient_err,
                "Response body rejected by both strict and lenient JSON"
            );
            Error::Decode(strict_err.to_string())
        })
    }
}
