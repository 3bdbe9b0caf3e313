//! # corenet
//!
//! A small HTTP client layer for JSON backends:
//! - One shared, lazily built HTTP client per backend
//! - `get`/`post` returning the raw response, whatever its status
//! - Bearer tokens attached only to allow-listed paths, read fresh from a
//!   [`TokenStore`] on every request
//! - Request/response logging through `tracing`
//! - Repositories that turn a call into a `Loading` → `Success`/`Failure`
//!   stream, extracting the `message` field from error bodies
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use corenet::{Async, NetworkClient, reduce};
//! use corenet_core::MemoryTokenStore;
//! use futures::StreamExt;
//! use serde::Deserialize;
//! use std::sync::Arc;
//!
//! #[derive(Deserialize)]
//! struct Page {
//!     items: Vec<String>,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tokens = Arc::new(MemoryTokenStore::with_token("secret"));
//!     let client = NetworkClient::new("https://api.example.com", tokens)?;
//!
//!     let states = reduce(
//!         || async { client.get("/api/v1/categories", None).await },
//!         |page: Page| Async::Success(page.items),
//!     );
//!     futures::pin_mut!(states);
//!
//!     while let Some(state) = states.next().await {
//!         println!("{:?}", state);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// Re-export commonly used types
pub use client::{Body, NetworkClient, NetworkClientBuilder};
pub use config::{ClientConfig, DEFAULT_BEARER_PATHS, LogLevel};
pub use corenet_core::{Async, AsyncError, MemoryTokenStore, TokenStore};
pub use error::{Error, Result};
pub use crate::http::{QueryParams, Response};
pub use repository::{NetworkRepository, reduce, try_reduce};

// Module declarations
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod repository;

/// Prelude module for common imports
///
/// ```rust
/// use corenet::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Async, ClientConfig, Error, LogLevel, NetworkClient, NetworkRepository, QueryParams,
        Response, Result, TokenStore, reduce, try_reduce,
    };
}

/// Crate version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
