//! Lazily initialised shared resources.
//!
//! A [`Resource`] is built once from its configuration, on first access, and
//! is read-only afterwards. [`LazyResource`] is the one-time initialisation
//! guard: concurrent callers racing on the first access all observe the same
//! instance, and clones of the guard share it.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// A value that is expensive to build and is constructed from a config.
///
/// # Examples
///
/// ```rust
/// use corenet_core::resource::Resource;
/// use async_trait::async_trait;
///
/// struct Pool {
///     size: usize,
/// }
///
/// #[async_trait]
/// impl Resource for Pool {
///     type Config = usize;
///     type Error = std::io::Error;
///
///     async fn initialize(size: usize) -> Result<Self, Self::Error> {
///         Ok(Self { size })
///     }
/// }
/// ```
#[async_trait]
pub trait Resource: Send + Sync + Sized {
    /// Configuration required to build the resource.
    type Config: Clone + Send + Sync;

    /// Error returned when construction fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Build the resource. Called at most once per successful [`LazyResource`].
    async fn initialize(config: Self::Config) -> Result<Self, Self::Error>;
}

/// One-time initialisation guard around a [`Resource`].
///
/// A failed initialisation leaves the guard empty, so the next access tries
/// again.
///
/// # Examples
///
/// ```rust
/// use corenet_core::resource::{LazyResource, Resource};
/// use async_trait::async_trait;
///
/// # struct Pool;
/// # #[async_trait]
/// # impl Resource for Pool {
/// #     type Config = ();
/// #     type Error = std::io::Error;
/// #     async fn initialize(_: ()) -> Result<Self, Self::Error> {
/// #         Ok(Pool)
/// #     }
/// # }
/// # #[tokio::main]
/// # async fn main() -> Result<(), std::io::Error> {
/// let pool: LazyResource<Pool> = LazyResource::new(());
/// assert!(!pool.is_initialized());
///
/// pool.get().await?;
/// assert!(pool.is_initialized());
/// # Ok(())
/// # }
/// ```
pub struct LazyResource<R: Resource> {
    inner: Arc<OnceCell<R>>,
    config: R::Config,
}

impl<R: Resource> LazyResource<R> {
    /// Create an uninitialised guard.
    pub fn new(config: R::Config) -> Self {
        Self {
            inner: Arc::new(OnceCell::new()),
            config,
        }
    }

    /// Get the resource, building it on first access.
    pub async fn get(&self) -> Result<&R, R::Error> {
        self.inner
            .get_or_try_init(|| async {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    resource = std::any::type_name::<R>(),
                    "Initializing lazy resource"
                );
                R::initialize(self.config.clone()).await
            })
            .await
    }

    /// Get the resource only if it has already been built.
    pub fn get_if_initialized(&self) -> Option<&R> {
        self.inner.get()
    }

    /// Check whether the resource has been built.
    pub fn is_initialized(&self) -> bool {
        self.inner.get().is_some()
    }
}

impl<R: Resource> Clone for LazyResource<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            config: self.config.clone(),
        }
    }
}

impl<R: Resource> std::fmt::Debug for LazyResource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyResource")
            .field("resource", &std::any::type_name::<R>())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
