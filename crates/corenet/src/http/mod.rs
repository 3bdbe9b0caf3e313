//! HTTP layer: request building, middleware and response handling
//!
//! The three plugins a [`NetworkClient`](crate::NetworkClient) installs live
//! here: the JSON codec, the logging middleware and bearer authentication.

pub use auth::BearerAuthMiddleware;
pub use json::{CONTENT_TYPE_JSON, JsonCodec};
pub use middleware::{Middleware, MiddlewareStack, TracingMiddleware};
pub use request::{QueryParams, RequestBuilder};
pub use response::Response;

mod auth;
mod json;
pub mod middleware;
pub(crate) mod request;
mod response;

// Re-export HTTP types from the http crate for convenience
pub use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
