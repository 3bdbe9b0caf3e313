//! Path-scoped bearer authentication

use super::{RequestBuilder, middleware::Middleware};
use crate::error::Error;
use async_trait::async_trait;
use corenet_core::TokenStore;
use http::{HeaderValue, header::AUTHORIZATION};
use secrecy::ExposeSecret;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// Attaches `Authorization: Bearer <token>` to allow-listed paths.
///
/// The token is read from the store on every matching request and never
/// kept. Requests to any other path are left untouched even when a token is
/// available.
#[derive(Clone)]
pub struct BearerAuthMiddleware {
    store: Arc<dyn TokenStore>,
    paths: Arc<BTreeSet<String>>,
}

impl BearerAuthMiddleware {
    /// Create the middleware from a token store and the allow-listed paths.
    pub fn new(store: Arc<dyn TokenStore>, paths: BTreeSet<String>) -> Self {
        Self {
            store,
            paths: Arc::new(paths),
        }
    }

    /// Whether a request to `path` gets the token.
    pub fn applies_to(&self, path: &str) -> bool {
        self.paths.contains(path)
    }
}

impl std::fmt::Debug for BearerAuthMiddleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerAuthMiddleware")
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Middleware for BearerAuthMiddleware {
    async fn process_request(&self, request: RequestBuilder) -> Result<RequestBuilder, Error> {
        if !self.applies_to(request.path()) {
            trace!(path = %request.path(), "Path not eligible for bearer token");
            return Ok(request);
        }

        let Some(token) = self.store.token() else {
            debug!(path = %request.path(), "No bearer token available, sending without one");
            return Ok(request);
        };

        let mut value = HeaderValue::try_from(format!("Bearer {}", token.expose_secret()))
            .map_err(|_| Error::HttpClient("Bearer token is not a valid header value".into()))?;
        value.set_sensitive(true);

        Ok(request.header(AUTHORIZATION, value))
    }
}
