//! HTTP response handling

use super::JsonCodec;
use crate::error::Result;
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// A fully received HTTP response.
///
/// `get`/`post` hand this back untouched whatever the status code is; status
/// interpretation belongs to [`reduce`](crate::repository::reduce).
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    url: Url,
    elapsed: Duration,
    codec: JsonCodec,
}

impl Response {
    /// Create a new response.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>, url: Url) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
            url,
            elapsed: Duration::ZERO,
            codec: JsonCodec::default(),
        }
    }

    /// Set the time the exchange took.
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// Set the codec used by [`json`](Self::json).
    pub fn with_codec(mut self, codec: JsonCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the raw body bytes.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Get the body as text, replacing invalid UTF-8 sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as JSON using the client's codec.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        self.codec.decode(&self.body)
    }

    /// The codec [`json`](Self::json) decodes with.
    pub fn codec(&self) -> JsonCodec {
        self.codec
    }

    /// The final request URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Time between sending the request and receiving the full body.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Check if the response is successful (2xx status).
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Check if the response is an error (4xx or 5xx status).
    pub fn is_error(&self) -> bool {
        self.status.is_client_error() || self.status.is_server_error()
    }
}
