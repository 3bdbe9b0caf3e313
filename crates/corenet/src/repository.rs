//! Reducing network calls into `Loading`/`Success`/`Failure` streams
//!
//! A repository wraps a call to [`NetworkClient`] and hands its observers a
//! stream of [`Async`] values instead of a raw response. The stream always
//! yields [`Async::Loading`] first and exactly one terminal value after it.
//!
//! # Example
//!
//! ```rust,no_run
//! use corenet::{Async, NetworkClient, NetworkRepository};
//! use futures::{Stream, StreamExt};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Page {
//!     items: Vec<String>,
//! }
//!
//! struct CategoryRepository {
//!     client: NetworkClient,
//! }
//!
//! impl NetworkRepository for CategoryRepository {
//!     fn client(&self) -> &NetworkClient {
//!         &self.client
//!     }
//! }
//!
//! impl CategoryRepository {
//!     fn categories(&self) -> impl Stream<Item = Async<Vec<String>>> + '_ {
//!         let client = self.client().clone();
//!         self.reduce(
//!             move || async move { client.get("/api/v1/categories", None).await },
//!             |page: Page| Async::Success(page.items),
//!         )
//!     }
//! }
//!
//! # async fn example(repo: CategoryRepository) {
//! let states: Vec<_> = repo.categories().collect().await;
//! assert!(states[0].is_loading());
//! # }
//! ```

use std::future::Future;

use async_stream::stream;
use corenet_core::Async;
use futures::Stream;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    client::NetworkClient,
    error::{Error, Result},
    http::Response,
};

/// Reduce a network call into a stream of states.
///
/// `call` runs once, after `Loading` has been yielded. A 2xx body is decoded
/// as `T` and passed to `block`, whose result is yielded as-is. A non-2xx
/// response becomes a failure carrying [`Error::Status`], its message read
/// with the same codec as success bodies. Transport and
/// decoding errors become a failure carrying the error itself.
///
/// Dropping the stream cancels the call; nothing is yielded afterwards.
pub fn reduce<T, U, F, Fut, M>(call: F, block: M) -> impl Stream<Item = Async<U>>
where
    T: DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Response>>,
    M: FnOnce(T) -> Async<U>,
{
    try_reduce(call, move |data: T| Ok::<_, Error>(block(data)))
}

/// [`reduce`] for mapping functions that can fail.
///
/// An `Err` from `block` becomes the terminal failure, like any other error.
pub fn try_reduce<T, U, E, F, Fut, M>(call: F, block: M) -> impl Stream<Item = Async<U>>
where
    T: DeserializeOwned,
    E: Into<Error>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Response>>,
    M: FnOnce(T) -> std::result::Result<Async<U>, E>,
{
    stream! {
        yield Async::Loading;

        let state = match settle(call, block).await {
            Ok(state) => state,
            Err(error) => {
                warn!(error = %error, "Network call reduced to failure");
                Async::failure(error)
            }
        };

        yield state;
    }
}

async fn settle<T, U, E, F, Fut, M>(call: F, block: M) -> Result<Async<U>>
where
    T: DeserializeOwned,
    E: Into<Error>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Response>>,
    M: FnOnce(T) -> std::result::Result<Async<U>, E>,
{
    let response = call().await?;

    if response.is_success() {
        let data = response.json::<T>()?;
        return block(data).map_err(Into::into);
    }

    let status = response.status().as_u16();
    let error = Error::from_response(status, &response.text(), response.codec());
    debug!(status, message = %error, "Non-success response reduced to failure");
    Ok(Async::failure(error))
}

/// Base for repositories built on a [`NetworkClient`].
///
/// Implementors only supply [`client`](Self::client); [`reduce`](Self::reduce)
/// and [`try_reduce`](Self::try_reduce) forward to the free functions of the
/// same name. Use those directly when the stream must not borrow the
/// repository, e.g. to move it into a spawned task.
pub trait NetworkRepository {
    /// The client this repository talks through.
    fn client(&self) -> &NetworkClient;

    /// See [`reduce`].
    fn reduce<T, U, F, Fut, M>(&self, call: F, block: M) -> impl Stream<Item = Async<U>>
    where
        T: DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Response>>,
        M: FnOnce(T) -> Async<U>,
    {
        reduce(call, block)
    }

    /// See [`try_reduce`].
    fn try_reduce<T, U, E, F, Fut, M>(&self, call: F, block: M) -> impl Stream<Item = Async<U>>
    where
        T: DeserializeOwned,
        E: Into<Error>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Response>>,
        M: FnOnce(T) -> std::result::Result<Async<U>, E>,
    {
        try_reduce(call, block)
    }
}
