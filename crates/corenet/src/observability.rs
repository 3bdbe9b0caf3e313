//! Centralized observability utilities for structured logging
//!
//! All HTTP requests/responses are logged through this layer so the field
//! names stay the same everywhere.

use crate::config::LogLevel;
use crate::http::{RequestBuilder, Response};
use http::{HeaderMap, header::AUTHORIZATION};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const REDACTED: &str = "<redacted>";

/// HTTP request metadata for structured logging
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Full request URL
    pub url: String,
    /// Request body size in bytes (optional)
    pub body_size: Option<usize>,
}

impl RequestMetadata {
    /// Create new request metadata
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            body_size: None,
        }
    }

    /// Capture metadata from a request about to be sent
    pub fn from_request(request: &RequestBuilder) -> Self {
        let metadata = Self::new(request.method().as_str(), request.url().as_str());
        match request.body_bytes() {
            Some(body) => metadata.with_body_size(body.len()),
            None => metadata,
        }
    }

    /// Set the request body size
    pub fn with_body_size(mut self, size: usize) -> Self {
        self.body_size = Some(size);
        self
    }

    /// Log request being sent
    pub fn log_request(&self, level: LogLevel, headers: &HeaderMap, body: Option<&[u8]>) {
        info!(
            method = %self.method,
            url = %self.url,
            body_size = self.body_size,
            "Sending HTTP request"
        );

        if level.logs_headers() {
            debug!(url = %self.url, headers = %format_headers(headers), "Request headers");
        }

        if level.logs_body()
            && let Some(body) = body
        {
            debug!(url = %self.url, body = %String::from_utf8_lossy(body), "Request body");
        }
    }
}

/// HTTP response metadata for structured logging
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// HTTP status code
    pub status: u16,
    /// Final request URL
    pub url: String,
    /// Response body size in bytes
    pub body_size: usize,
    /// Time elapsed for the request
    pub elapsed: Duration,
}

impl ResponseMetadata {
    /// Capture metadata from a received response
    pub fn from_response(response: &Response) -> Self {
        Self {
            status: response.status().as_u16(),
            url: response.url().to_string(),
            body_size: response.body().len(),
            elapsed: response.elapsed(),
        }
    }

    /// Log received response
    pub fn log_response(&self, level: LogLevel, headers: &HeaderMap, body: &[u8]) {
        if (200..300).contains(&self.status) {
            info!(
                url = %self.url,
                status = self.status,
                elapsed_ms = self.elapsed.as_millis(),
                body_size = self.body_size,
                "HTTP request succeeded"
            );
        } else {
            warn!(
                url = %self.url,
                status = self.status,
                elapsed_ms = self.elapsed.as_millis(),
                body_size = self.body_size,
                "HTTP request returned non-success status"
            );
        }

        if level.logs_headers() {
            debug!(url = %self.url, headers = %format_headers(headers), "Response headers");
        }

        if level.logs_body() {
            debug!(url = %self.url, body = %String::from_utf8_lossy(body), "Response body");
        }
    }
}

/// Timer for measuring request duration
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Start a new timer
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed duration
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Render headers as `name: value` pairs with credentials masked.
pub fn format_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if *name == AUTHORIZATION || value.is_sensitive() {
                REDACTED
            } else {
                value.to_str().unwrap_or("<binary>")
            };
            format!("{}: {}", name, shown)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Install a `tracing` subscriber honouring `RUST_LOG`, defaulting to `info`.
///
/// Intended for binaries and demos; libraries should leave subscriber setup
/// to the application. Calling it twice is harmless.
#[cfg(feature = "trace")]
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
