//! Network client: the shared HTTP client and its `get`/`post` methods

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use corenet_core::TokenStore;
use corenet_core::resource::{LazyResource, Resource};
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use tracing::warn;
use url::Url;

use crate::{
    config::{ClientConfig, LogLevel},
    error::{Error, Result},
    http::{
        BearerAuthMiddleware, CONTENT_TYPE_JSON, JsonCodec, Middleware, MiddlewareStack,
        QueryParams, RequestBuilder, Response, TracingMiddleware, request::build_url,
    },
};

/// Request body accepted by [`NetworkClient::post`].
pub type Body<'a> = &'a (dyn erased_serde::Serialize + Send + Sync);

/// HTTP client shared by every request of a [`NetworkClient`].
///
/// Holds the connection pool, so building it once and reusing it keeps
/// TCP/TLS connections alive across calls.
#[derive(Debug, Clone)]
pub struct SharedHttpClient(reqwest::Client);

/// Settings the shared client is built from.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    user_agent: String,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
}

#[async_trait]
impl Resource for SharedHttpClient {
    type Config = TransportConfig;
    type Error = Error;

    async fn initialize(config: TransportConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .default_headers(config.default_headers);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        builder
            .build()
            .map(SharedHttpClient)
            .map_err(|e| Error::HttpClient(e.to_string()))
    }
}

/// Client for a single backend.
///
/// Every request goes through the same pipeline: JSON content negotiation,
/// bearer authentication for allow-listed paths and `tracing` logging. The
/// underlying HTTP client is built on the first request and reused after
/// that. Cloning is cheap and clones share everything.
///
/// # Example
///
/// ```rust,no_run
/// use corenet::NetworkClient;
/// use corenet_core::MemoryTokenStore;
/// use std::sync::Arc;
///
/// # async fn example() -> corenet::Result<()> {
/// let tokens = Arc::new(MemoryTokenStore::with_token("secret"));
/// let client = NetworkClient::new("https://api.example.com", tokens)?;
///
/// let response = client.get("/api/v1/categories", None).await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct NetworkClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    base_url: Url,
    http: LazyResource<SharedHttpClient>,
    middleware: MiddlewareStack,
    codec: JsonCodec,
}

impl NetworkClient {
    /// Create a client with default settings.
    pub fn new(base_url: impl Into<String>, token_store: Arc<dyn TokenStore>) -> Result<Self> {
        Self::builder(base_url).token_store(token_store).build()
    }

    /// Create a client from a configuration object.
    pub fn from_config(config: ClientConfig, token_store: Arc<dyn TokenStore>) -> Result<Self> {
        NetworkClientBuilder {
            config,
            token_store: Some(token_store),
            middleware: Vec::new(),
        }
        .build()
    }

    /// Create a new client builder for advanced configuration.
    pub fn builder(base_url: impl Into<String>) -> NetworkClientBuilder {
        NetworkClientBuilder {
            config: ClientConfig::new(base_url),
            token_store: None,
            middleware: Vec::new(),
        }
    }

    /// Send a GET request to `path` relative to the base URL.
    ///
    /// The response is returned whatever its status code.
    pub async fn get(&self, path: &str, params: Option<&QueryParams>) -> Result<Response> {
        self.execute(Method::GET, path, params, None).await
    }

    /// Send a POST request to `path` with an optional JSON body.
    ///
    /// ```rust,no_run
    /// # use corenet::NetworkClient;
    /// # async fn example(client: NetworkClient) -> corenet::Result<()> {
    /// let body = serde_json::json!({"id": 1});
    /// let response = client.post("/orders", None, Some(&body)).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn post(
        &self,
        path: &str,
        params: Option<&QueryParams>,
        body: Option<Body<'_>>,
    ) -> Result<Response> {
        let body = body.map(|body| self.inner.codec.encode(body)).transpose()?;
        self.execute(Method::POST, path, params, body).await
    }

    /// The base URL every path is appended to.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Whether the shared HTTP client has been built yet.
    pub fn is_initialized(&self) -> bool {
        self.inner.http.is_initialized()
    }

    /// The codec used for request and response bodies.
    pub fn codec(&self) -> JsonCodec {
        self.inner.codec
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        params: Option<&QueryParams>,
        body: Option<Vec<u8>>,
    ) -> Result<Response> {
        let http = self.inner.http.get().await?;
        let url = build_url(&self.inner.base_url, path, params)?;

        let mut request = RequestBuilder::new(method, url)
            .with_client(http.0.clone())
            .codec(self.inner.codec)
            .header(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON))
            .header(ACCEPT, HeaderValue::from_static(CONTENT_TYPE_JSON));

        if let Some(body) = body {
            request = request.body(body);
        }

        let request = self.inner.middleware.process_request(request).await?;
        let (method, url) = (request.method().clone(), request.url().clone());

        let response = request.send().await.inspect_err(|error| {
            warn!(method = %method, url = %url, error = %error, "HTTP request failed");
        })?;

        self.inner.middleware.process_response(response).await
    }
}

impl std::fmt::Debug for NetworkClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("http", &self.inner.http)
            .field("middleware", &self.inner.middleware)
            .finish()
    }
}

/// Builder for creating a configured [`NetworkClient`].
pub struct NetworkClientBuilder {
    config: ClientConfig,
    token_store: Option<Arc<dyn TokenStore>>,
    middleware: Vec<Box<dyn Middleware>>,
}

impl NetworkClientBuilder {
    /// Set the store bearer tokens are read from.
    ///
    /// Without one, no request carries a bearer token.
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    /// Replace the paths that receive the bearer token.
    pub fn bearer_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.bearer_paths = paths.into_iter().map(Into::into).collect::<BTreeSet<_>>();
        self
    }

    /// Set the HTTP logging verbosity.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.log_level = level;
        self
    }

    /// Enable or disable the JSON5 decoding fallback.
    pub fn lenient_json(mut self, lenient: bool) -> Self {
        self.config.lenient_json = lenient;
        self
    }

    /// Set a request timeout. None is configured by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    /// Add a header sent with every request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Install extra middleware. It runs after bearer authentication and
    /// before logging.
    pub fn middleware(mut self, middleware: Box<dyn Middleware>) -> Self {
        self.middleware.push(middleware);
        self
    }

    /// Build the client.
    ///
    /// Nothing touches the network here; the HTTP client itself is created
    /// on the first request.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute `http`/`https`
    /// URL or a default header is invalid.
    pub fn build(self) -> Result<NetworkClient> {
        let Self {
            config,
            token_store,
            middleware,
        } = self;

        let base_url = parse_base_url(&config.base_url)?;
        let default_headers = parse_headers(&config.default_headers)?;

        let token_store = match token_store {
            Some(store) => store,
            None => Arc::new(no_token) as Arc<dyn TokenStore>,
        };

        let mut stack = MiddlewareStack::new();
        stack.push(Box::new(BearerAuthMiddleware::new(
            token_store,
            config.bearer_paths,
        )));
        for extra in middleware {
            stack.push(extra);
        }
        if config.log_level.is_enabled() {
            stack.push(Box::new(TracingMiddleware::new(config.log_level)));
        }

        let transport = TransportConfig {
            user_agent: config
                .user_agent
                .unwrap_or_else(|| format!("corenet-rust/{}", crate::VERSION)),
            default_headers,
            timeout: config.timeout,
        };

        let codec = if config.lenient_json {
            JsonCodec::lenient()
        } else {
            JsonCodec::strict()
        };

        Ok(NetworkClient {
            inner: Arc::new(ClientInner {
                base_url,
                http: LazyResource::new(transport),
                middleware: stack,
                codec,
            }),
        })
    }
}

fn no_token() -> Option<String> {
    None
}

fn parse_base_url(raw: &str) -> Result<Url> {
    if raw.trim().is_empty() {
        return Err(Error::InvalidUrl("Base URL cannot be empty".to_string()));
    }

    let url: Url = raw
        .parse()
        .map_err(|e| Error::InvalidUrl(format!("'{}': {}", raw, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::InvalidUrl(format!(
            "Invalid URL scheme '{}'. Only 'http' and 'https' are supported.",
            scheme
        ))),
    }
}

fn parse_headers(raw: &std::collections::HashMap<String, String>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(raw.len());
    for (key, value) in raw {
        let name = key
            .parse::<HeaderName>()
            .map_err(|e| Error::HttpClient(format!("Invalid header name '{}': {}", key, e)))?;
        let value = value
            .parse::<HeaderValue>()
            .map_err(|e| Error::HttpClient(format!("Invalid header value for '{}': {}", key, e)))?;
        headers.insert(name, value);
    }
    Ok(headers)
}
