#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core abstractions for the corenet HTTP layer.
//!
//! This crate holds the pieces that do not depend on an HTTP stack:
//!
//! - **`Async<T>`**: the three-state value (`Loading`, `Success`, `Failure`)
//!   that repositories publish to their observers
//! - **`TokenStore`**: the capability the client reads bearer tokens from
//! - **`LazyResource<R>`**: one-time, async initialisation of a shared resource
//!
//! # Examples
//!
//! ```rust
//! use corenet_core::prelude::*;
//!
//! let state: Async<u32> = Async::Success(7);
//! assert_eq!(state.value(), Some(&7));
//!
//! let store = MemoryTokenStore::with_token("abc");
//! assert!(store.token().is_some());
//! ```

pub mod resource;
pub mod state;
pub mod token;

pub use state::{Async, AsyncError};
pub use token::{MemoryTokenStore, TokenStore};

/// Convenient re-exports of commonly used items.
///
/// ```rust
/// use corenet_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::resource::{LazyResource, Resource};
    pub use crate::state::{Async, AsyncError};
    pub use crate::token::{MemoryTokenStore, TokenStore};
}
