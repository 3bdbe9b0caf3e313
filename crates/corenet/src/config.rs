//! Configuration for the network client

use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

/// Paths that receive the bearer token unless configured otherwise.
pub const DEFAULT_BEARER_PATHS: [&str; 4] = [
    "/qris",
    "/api/v1/product",
    "/api/v1/product/prepaid",
    "/api/v1/categories",
];

/// How much of each exchange the logging middleware records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Request line, headers and bodies.
    #[default]
    All,
    /// Request line and headers.
    Headers,
    /// Request line and bodies.
    Body,
    /// Request line, status and timing only.
    Info,
    /// No HTTP logging.
    None,
}

impl LogLevel {
    /// Whether headers are logged.
    pub fn logs_headers(self) -> bool {
        matches!(self, LogLevel::All | LogLevel::Headers)
    }

    /// Whether bodies are logged.
    pub fn logs_body(self) -> bool {
        matches!(self, LogLevel::All | LogLevel::Body)
    }

    /// Whether anything is logged.
    pub fn is_enabled(self) -> bool {
        self != LogLevel::None
    }
}

/// Configuration for a [`NetworkClient`](crate::NetworkClient).
///
/// The token store is not part of the config; it is handed to the builder so
/// the config itself stays plain data that can be deserialized.
///
/// ```rust
/// use corenet::ClientConfig;
///
/// let config: ClientConfig = serde_json::from_str(r#"{
///     "base_url": "https://api.example.com",
///     "log_level": "info",
///     "timeout": 30
/// }"#).unwrap();
///
/// assert!(config.is_bearer_path("/api/v1/categories"));
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL every request path is appended to
    pub base_url: String,

    /// Exact request paths that receive the bearer token
    #[serde(default = "default_bearer_paths")]
    pub bearer_paths: BTreeSet<String>,

    /// HTTP logging verbosity
    #[serde(default)]
    pub log_level: LogLevel,

    /// Fall back to JSON5 when strict JSON decoding fails
    #[serde(default = "default_lenient")]
    pub lenient_json: bool,

    /// Request timeout; `None` leaves the transport default in place
    #[serde(default, deserialize_with = "deserialize_timeout")]
    pub timeout: Option<Duration>,

    /// User-Agent header value
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Headers sent with every request
    #[serde(default)]
    pub default_headers: HashMap<String, String>,
}

impl ClientConfig {
    /// Create a configuration with defaults for everything but the base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_paths: default_bearer_paths(),
            log_level: LogLevel::default(),
            lenient_json: default_lenient(),
            timeout: None,
            user_agent: None,
            default_headers: HashMap::new(),
        }
    }

    /// Whether a request to `path` should carry the bearer token.
    ///
    /// Matching is exact: no prefix, trailing-slash or case folding.
    pub fn is_bearer_path(&self, path: &str) -> bool {
        self.bearer_paths.contains(path)
    }
}

fn default_bearer_paths() -> BTreeSet<String> {
    DEFAULT_BEARER_PATHS.iter().map(|p| p.to_string()).collect()
}

fn default_lenient() -> bool {
    true
}

/// Timeouts are written as whole seconds in config files.
fn deserialize_timeout<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
}
