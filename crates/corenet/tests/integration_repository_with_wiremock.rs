//! Integration tests for reduce/try_reduce and NetworkRepository using wiremock

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use common::{Category, CategoryPage};
use corenet::{Async, Error, NetworkClient, NetworkRepository, reduce, try_reduce};
use futures::{Stream, StreamExt};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

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

    fn first_category(&self) -> impl Stream<Item = Async<Category>> + '_ {
        self.try_reduce(
            || self.client().get("/api/v1/categories", None),
            |page: CategoryPage| {
                page.items
                    .into_iter()
                    .next()
                    .map(Async::Success)
                    .ok_or_else(|| Error::mapping("no categories"))
            },
        )
    }
}

async fn mount_categories(server: &MockServer, fixture: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v1/categories"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(common::load_response_fixture(fixture)),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_empty_listing_reduces_to_success() {
    common::init_test_tracing();
    let mock_server = MockServer::start().await;
    mount_categories(&mock_server, "categories_empty").await;

    let client = common::client_for(&mock_server, common::test_store());
    let states = common::collect_states(reduce(
        || client.get("/api/v1/categories", None),
        |page: CategoryPage| Async::Success(page.items),
    ))
    .await;

    assert_eq!(states, vec![Async::Loading, Async::Success(vec![])]);
}

#[tokio::test]
async fn test_not_found_reduces_to_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/unknown"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string(common::load_response_fixture("not_found")),
        )
        .mount(&mock_server)
        .await;

    let client = common::client_for(&mock_server, common::test_store());
    let states = common::collect_states(reduce(
        || client.get("/unknown", None),
        |page: CategoryPage| Async::Success(page.items),
    ))
    .await;

    assert_eq!(states, vec![Async::Loading, Async::failure("not found")]);

    let error = states[1].error().unwrap();
    assert_eq!(error.downcast_ref::<Error>().and_then(Error::status), Some(404));
}

#[tokio::test]
async fn test_plain_text_error_reduces_to_raw_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = common::client_for(&mock_server, common::test_store());
    let body = json!({"id": 1});
    let states = common::collect_states(reduce(
        || client.post("/orders", None, Some(&body)),
        |order: serde_json::Value| Async::Success(order),
    ))
    .await;

    assert_eq!(states, vec![Async::Loading, Async::failure("internal error")]);
    mock_server.verify().await;
}

#[tokio::test]
async fn test_error_body_without_message_reduces_to_raw_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(422).set_body_string(r#"{"error":"invalid","code":42}"#),
        )
        .mount(&mock_server)
        .await;

    let client = common::client_for(&mock_server, common::test_store());
    let states = common::collect_states(reduce(
        || client.get("/api/v1/product", None),
        |page: CategoryPage| Async::Success(page.items),
    ))
    .await;

    assert_eq!(
        states,
        vec![
            Async::Loading,
            Async::failure(r#"{"error":"invalid","code":42}"#)
        ]
    );
}

#[tokio::test]
async fn test_lenient_error_body_reduces_to_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/qris"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(common::load_response_fixture("invalid_phone_lenient")),
        )
        .mount(&mock_server)
        .await;

    let body = json!({"phone": "08xx"});

    let lenient = common::client_for(&mock_server, common::test_store());
    let states = common::collect_states(reduce(
        || lenient.post("/qris", None, Some(&body)),
        |qr: serde_json::Value| Async::Success(qr),
    ))
    .await;
    assert_eq!(
        states,
        vec![Async::Loading, Async::failure("invalid phone number")]
    );

    let strict = NetworkClient::builder(mock_server.uri())
        .lenient_json(false)
        .build()
        .expect("Failed to build client");
    let states = common::collect_states(reduce(
        || strict.post("/qris", None, Some(&body)),
        |qr: serde_json::Value| Async::Success(qr),
    ))
    .await;
    let raw = common::load_response_fixture("invalid_phone_lenient");
    assert_eq!(states, vec![Async::Loading, Async::failure(raw)]);
}

#[tokio::test]
async fn test_null_message_reduces_to_null_text() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string(r#"{"message":null}"#))
        .mount(&mock_server)
        .await;

    let client = common::client_for(&mock_server, common::test_store());
    let states = common::collect_states(reduce(
        || client.get("/api/v1/product", None),
        |page: CategoryPage| Async::Success(page.items),
    ))
    .await;

    assert_eq!(states, vec![Async::Loading, Async::failure("null")]);
}

#[tokio::test]
async fn test_reduce_is_repeatable() {
    let mock_server = MockServer::start().await;
    mount_categories(&mock_server, "categories").await;

    let repo = CategoryRepository {
        client: common::client_for(&mock_server, common::test_store()),
    };

    let first = common::collect_states(repo.categories()).await;
    let second = common::collect_states(repo.categories()).await;

    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
    assert_eq!(first[1].value().map(Vec::len), Some(3));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_repository_try_reduce() {
    let mock_server = MockServer::start().await;
    mount_categories(&mock_server, "categories").await;

    let repo = CategoryRepository {
        client: common::client_for(&mock_server, common::test_store()),
    };

    let states = common::collect_states(repo.first_category()).await;
    assert_eq!(
        states,
        vec![
            Async::Loading,
            Async::Success(Category {
                id: 1,
                name: "Pulsa".to_string(),
            })
        ]
    );
}

#[tokio::test]
async fn test_repository_try_reduce_mapping_failure() {
    let mock_server = MockServer::start().await;
    mount_categories(&mock_server, "categories_empty").await;

    let repo = CategoryRepository {
        client: common::client_for(&mock_server, common::test_store()),
    };

    let states = common::collect_states(repo.first_category()).await;
    assert_eq!(
        states,
        vec![Async::Loading, Async::failure("Mapping failed: no categories")]
    );
}

#[tokio::test]
async fn test_malformed_success_body_reduces_to_decode_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&mock_server)
        .await;

    let client = common::client_for(&mock_server, common::test_store());
    let states = common::collect_states(reduce(
        || client.get("/api/v1/categories", None),
        |page: CategoryPage| Async::Success(page.items),
    ))
    .await;

    assert_eq!(states.len(), 2);
    assert!(states[0].is_loading());
    let error = states[1].error().unwrap();
    assert!(matches!(
        error.downcast_ref::<Error>(),
        Some(Error::Decode(_))
    ));
}

#[tokio::test]
async fn test_transport_failure_reduces_to_failure() {
    let client = NetworkClient::new("http://127.0.0.1:9", common::test_store())
        .expect("Failed to build client");

    let states = common::collect_states(reduce(
        || client.get("/api/v1/categories", None),
        |page: CategoryPage| Async::Success(page.items),
    ))
    .await;

    assert_eq!(states.len(), 2);
    assert!(states[0].is_loading());
    let error = states[1].error().unwrap();
    assert!(
        error
            .downcast_ref::<Error>()
            .is_some_and(Error::is_transport)
    );
}

#[tokio::test]
async fn test_dropping_stream_after_loading_stops_emission() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"items":[]}"#)
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = common::client_for(&mock_server, common::test_store());
    let mapped = Arc::new(AtomicUsize::new(0));
    let counter = mapped.clone();

    let states = reduce(
        || client.get("/api/v1/categories", None),
        move |page: CategoryPage| {
            counter.fetch_add(1, Ordering::SeqCst);
            Async::Success(page.items)
        },
    );
    let mut states = Box::pin(states);

    assert_eq!(states.next().await, Some(Async::Loading));

    // Start the call, then give up on it.
    let pending = tokio::time::timeout(Duration::from_millis(100), states.next()).await;
    assert!(pending.is_err());
    drop(states);

    assert_eq!(mapped.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_streams_are_independent() {
    let mock_server = MockServer::start().await;
    mount_categories(&mock_server, "categories").await;

    Mock::given(method("GET"))
        .and(path("/unknown"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string(common::load_response_fixture("not_found")),
        )
        .mount(&mock_server)
        .await;

    let client = common::client_for(&mock_server, common::test_store());

    let (ok, failed) = tokio::join!(
        common::collect_states(reduce(
            || client.get("/api/v1/categories", None),
            |page: CategoryPage| Async::Success(page.items.len()),
        )),
        common::collect_states(reduce(
            || client.get("/unknown", None),
            |page: CategoryPage| Async::Success(page.items.len()),
        )),
    );

    assert_eq!(ok, vec![Async::Loading, Async::Success(3)]);
    assert_eq!(failed, vec![Async::Loading, Async::failure("not found")]);
}

#[tokio::test]
async fn test_try_reduce_free_function_with_anyhow() {
    let mock_server = MockServer::start().await;
    mount_categories(&mock_server, "categories").await;

    let client = common::client_for(&mock_server, common::test_store());
    let states = common::collect_states(try_reduce(
        || client.get("/api/v1/categories", None),
        |page: CategoryPage| -> anyhow::Result<Async<String>> {
            let names: Vec<_> = page.items.into_iter().map(|c| c.name).collect();
            anyhow::ensure!(!names.is_empty(), "empty listing");
            Ok(Async::Success(names.join(", ")))
        },
    ))
    .await;

    assert_eq!(
        states,
        vec![
            Async::Loading,
            Async::Success("Pulsa, Paket Data, Token Listrik".to_string())
        ]
    );
}
