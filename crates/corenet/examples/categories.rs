//! Fetch the category listing and print every state the repository emits
//!
//! ## Usage
//!
//! ```bash
//! # base URL defaults to http://localhost:8080, token is optional
//! RUST_LOG=corenet=debug cargo run --example categories --features trace -- \
//!     https://api.example.com my-token
//! ```

use std::sync::Arc;

use corenet::{Async, MemoryTokenStore, NetworkClient, NetworkRepository};
use futures::{Stream, StreamExt};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Category {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct CategoryPage {
    items: Vec<Category>,
}

struct CategoryRepository {
    client: NetworkClient,
}

impl NetworkRepository for CategoryRepository {
    fn client(&self) -> &NetworkClient {
        &self.client
    }
}

impl CategoryRepository {
    fn categories(&self) -> impl Stream<Item = Async<Vec<Category>>> + '_ {
        self.reduce(
            || self.client().get("/api/v1/categories", None),
            |page: CategoryPage| Async::Success(page.items),
        )
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    corenet::observability::init_tracing();

    let mut args = std::env::args().skip(1);
    let base_url = args
        .next()
        .unwrap_or_else(|| "http://localhost:8080".to_string());

    let tokens = Arc::new(MemoryTokenStore::new());
    if let Some(token) = args.next() {
        tokens.set_token(token);
    }

    let repo = CategoryRepository {
        client: NetworkClient::new(base_url, tokens)?,
    };

    let states = repo.categories();
    futures::pin_mut!(states);

    while let Some(state) = states.next().await {
        match state {
            Async::Loading => println!("loading..."),
            Async::Success(items) => {
                for category in items {
                    println!("{:>4}  {}", category.id, category.name);
                }
            }
            Async::Failure(error) => println!("failed: {}", error),
        }
    }

    Ok(())
}
