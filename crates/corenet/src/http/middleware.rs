//! HTTP middleware for request/response processing

use super::{RequestBuilder, Response};
use crate::config::LogLevel;
use crate::observability::{RequestMetadata, ResponseMetadata};
use async_trait::async_trait;

/// Trait for HTTP middleware.
#[async_trait]
pub trait Middleware: Send + Sync {
    /// Process a request before sending.
    async fn process_request(
        &self,
        request: RequestBuilder,
    ) -> Result<RequestBuilder, crate::error::Error> {
        Ok(request)
    }

    /// Process a response after receiving.
    async fn process_response(&self, response: Response) -> Result<Response, crate::error::Error> {
        Ok(response)
    }
}

/// Middleware that logs every exchange through `tracing`.
#[derive(Debug, Clone, Copy)]
pub struct TracingMiddleware {
    level: LogLevel,
}

impl TracingMiddleware {
    /// Create a logging middleware with the given verbosity.
    pub fn new(level: LogLevel) -> Self {
        Self { level }
    }
}

#[async_trait]
impl Middleware for TracingMiddleware {
    async fn process_request(
        &self,
        request: RequestBuilder,
    ) -> Result<RequestBuilder, crate::error::Error> {
        if self.level.is_enabled() {
            RequestMetadata::from_request(&request).log_request(
                self.level,
                request.headers(),
                request.body_bytes(),
            );
        }
        Ok(request)
    }

    async fn process_response(&self, response: Response) -> Result<Response, crate::error::Error> {
        if self.level.is_enabled() {
            ResponseMetadata::from_response(&response).log_response(
                self.level,
                response.headers(),
                response.body(),
            );
        }
        Ok(response)
    }
}

/// Composite middleware that chains multiple middleware.
///
/// Requests pass through in insertion order, responses in reverse.
#[derive(Default)]
pub struct MiddlewareStack {
    middlewares: Vec<Box<dyn Middleware>>,
}

impl MiddlewareStack {
    /// Create a new middleware stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a middleware to the stack.
    pub fn push(&mut self, middleware: Box<dyn Middleware>) {
        self.middlewares.push(middleware);
    }

    /// Number of installed middleware.
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    /// Whether the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}

impl std::fmt::Debug for MiddlewareStack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareStack")
            .field("len", &self.middlewares.len())
            .finish()
    }
}

#[async_trait]
impl Middleware for MiddlewareStack {
    async fn process_request(
        &self,
        mut request: RequestBuilder,
    ) -> Result<RequestBuilder, crate::error::Error> {
        for middleware in &self.middlewares {
            request = middleware.process_request(request).await?;
        }
        Ok(request)
    }

    async fn process_response(
        &self,
        mut response: Response,
    ) -> Result<Response, crate::error::Error> {
        for middleware in self.middlewares.iter().rev() {
            response = middleware.process_response(response).await?;
        }
        Ok(response)
    }
}
