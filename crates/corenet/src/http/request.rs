//! HTTP request builder

use super::{JsonCodec, Response};
use crate::error::{Error, Result};
use crate::observability::RequestTimer;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use std::collections::{BTreeMap, HashMap};
use url::Url;

/// Query parameters appended to a request URL.
pub type QueryParams = HashMap<String, String>;

/// Builder for a single outgoing request.
///
/// Middleware receives and returns this builder, so everything it may want
/// to inspect or change (URL, headers, body) is reachable here.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Bytes>,
    codec: JsonCodec,
    pub(crate) http_client: Option<reqwest::Client>,
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            codec: JsonCodec::default(),
            http_client: None,
        }
    }

    /// Set the HTTP client to use
    pub(crate) fn with_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set a header, replacing any previous value.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set a header from strings, returning an error if the name or value
    /// is invalid.
    pub fn try_header(self, key: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let (key, value) = (key.as_ref(), value.as_ref());

        let name = key
            .parse::<HeaderName>()
            .map_err(|e| Error::HttpClient(format!("Invalid header name '{}': {}", key, e)))?;
        let value = value
            .parse::<HeaderValue>()
            .map_err(|e| Error::HttpClient(format!("Invalid header value for '{}': {}", key, e)))?;

        Ok(self.header(name, value))
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the codec the response will decode with.
    pub fn codec(mut self, codec: JsonCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Send the request and read the full response.
    ///
    /// Any status code is returned as `Ok`; only transport failures are
    /// errors here.
    pub async fn send(self) -> Result<Response> {
        let client = self
            .http_client
            .ok_or_else(|| Error::HttpClient("No HTTP client configured".to_string()))?;

        let mut req = client.request(self.method, self.url).headers(self.headers);

        if let Some(body) = self.body {
            req = req.body(body);
        }

        let timer = RequestTimer::start();
        let resp = req.send().await.map_err(Error::from_reqwest)?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let url = resp.url().clone();
        let body = resp.bytes().await.map_err(Error::from_reqwest)?;

        Ok(Response::new(status, headers, body, url)
            .with_elapsed(timer.elapsed())
            .with_codec(self.codec))
    }

    /// Get the method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Get the encoded URL path, the value bearer auth matches against.
    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// Get the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get the body, if one is set.
    pub fn body_bytes(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// Append `path` to `base` and add the query parameters.
///
/// The path is split on `/`; empty segments are dropped and each remaining
/// segment is percent-encoded. Parameters are appended in key order after
/// any query the base URL already carries.
pub(crate) fn build_url(base: &Url, path: &str, params: Option<&QueryParams>) -> Result<Url> {
    let mut url = base.clone();

    url.path_segments_mut()
        .map_err(|_| Error::InvalidUrl(format!("'{}' cannot be used as a base URL", base)))?
        .pop_if_empty()
        .extend(path.split('/').filter(|segment| !segment.is_empty()));

    if let Some(params) = params.filter(|p| !p.is_empty()) {
        let ordered: BTreeMap<_, _> = params.iter().collect();
        let mut query = url.query_pairs_mut();
        for (key, value) in ordered {
            query.append_pair(key, value);
        }
    }

    Ok(url)
}
