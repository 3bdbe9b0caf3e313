//! Common test utilities and helpers

use std::path::Path;
use std::sync::Arc;

use corenet::{Async, LogLevel, MemoryTokenStore, NetworkClient, TokenStore};
use futures::{Stream, StreamExt};
use serde::Deserialize;
use wiremock::MockServer;

/// A category as served by the backend
#[allow(dead_code)]
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Category {
    pub id: u32,
    pub name: String,
}

/// Paged category listing
#[allow(dead_code)]
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CategoryPage {
    pub items: Vec<Category>,
}

/// Load a response fixture
#[allow(dead_code)]
pub fn load_response_fixture(name: &str) -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = Path::new(manifest_dir)
        .join("tests")
        .join("fixtures")
        .join("responses")
        .join(format!("{}.json", name));

    std::fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!(
            "Failed to load response fixture '{}' from {:?}: {}",
            name, path, e
        )
    })
}

/// Create a test bearer token
#[allow(dead_code)]
pub fn test_token() -> String {
    "tok-test-0123456789abcdef".to_string()
}

/// Token store holding [`test_token`]
#[allow(dead_code)]
pub fn test_store() -> Arc<MemoryTokenStore> {
    Arc::new(MemoryTokenStore::with_token(test_token()))
}

/// Client pointing at the mock server, authenticated with `store`
#[allow(dead_code)]
pub fn client_for(server: &MockServer, store: Arc<dyn TokenStore>) -> NetworkClient {
    NetworkClient::builder(server.uri())
        .token_store(store)
        .log_level(LogLevel::All)
        .build()
        .expect("Failed to build client")
}

/// Drain a state stream into a Vec
#[allow(dead_code)]
pub async fn collect_states<U>(states: impl Stream<Item = Async<U>>) -> Vec<Async<U>> {
    states.collect().await
}

/// Install a test subscriber so request logs show up with `--nocapture`
#[allow(dead_code)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("corenet=debug")
        .with_test_writer()
        .try_init();
}
