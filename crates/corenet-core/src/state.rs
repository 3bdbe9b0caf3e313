//! Three-state value describing an asynchronous computation.
//!
//! A well-formed sequence of `Async` values starts with [`Async::Loading`]
//! and ends with exactly one terminal value, either [`Async::Success`] or
//! [`Async::Failure`].

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Error payload carried by [`Async::Failure`].
///
/// Shared so that `Async<T>` stays `Clone` whenever `T` is. Use
/// [`downcast_ref`](std::error::Error) on the trait object to recover a
/// concrete error type.
pub type AsyncError = Arc<dyn StdError + Send + Sync + 'static>;

/// An in-progress, succeeded or failed asynchronous computation.
///
/// # Examples
///
/// ```rust
/// use corenet_core::Async;
///
/// let loading: Async<String> = Async::Loading;
/// assert!(loading.is_loading());
///
/// let failed: Async<String> = Async::failure("not found");
/// assert_eq!(failed.error().unwrap().to_string(), "not found");
/// ```
#[derive(Clone)]
pub enum Async<T> {
    /// The computation has started and no result is available yet.
    Loading,
    /// The computation finished with a value.
    Success(T),
    /// The computation failed.
    Failure(AsyncError),
}

impl<T> Async<T> {
    /// Build a failure from anything convertible into a boxed error,
    /// including plain `&str` and `String` messages.
    pub fn failure<E>(error: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync + 'static>>,
    {
        Async::Failure(Arc::from(error.into()))
    }

    /// `true` for [`Async::Loading`].
    pub fn is_loading(&self) -> bool {
        matches!(self, Async::Loading)
    }

    /// `true` for [`Async::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Async::Success(_))
    }

    /// `true` for [`Async::Failure`].
    pub fn is_failure(&self) -> bool {
        matches!(self, Async::Failure(_))
    }

    /// `true` once the computation has produced its final value.
    pub fn is_terminal(&self) -> bool {
        !self.is_loading()
    }

    /// Borrow the success value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Async::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Take the success value, if any.
    pub fn into_value(self) -> Option<T> {
        match self {
            Async::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Borrow the failure payload, if any.
    pub fn error(&self) -> Option<&AsyncError> {
        match self {
            Async::Failure(error) => Some(error),
            _ => None,
        }
    }

    /// Transform the success value, leaving the other variants untouched.
    pub fn map<U, F>(self, f: F) -> Async<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Async::Loading => Async::Loading,
            Async::Success(value) => Async::Success(f(value)),
            Async::Failure(error) => Async::Failure(error),
        }
    }
}

impl<T, E> From<Result<T, E>> for Async<T>
where
    E: Into<Box<dyn StdError + Send + Sync + 'static>>,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Async::Success(value),
            Err(error) => Async::failure(error),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Async<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Async::Loading => f.write_str("Loading"),
            Async::Success(value) => f.debug_tuple("Success").field(value).finish(),
            Async::Failure(error) => f.debug_tuple("Failure").field(&error.to_string()).finish(),
        }
    }
}

/// Failures compare equal when their messages match.
impl<T: PartialEq> PartialEq for Async<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Async::Loading, Async::Loading) => true,
            (Async::Success(a), Async::Success(b)) => a == b,
            (Async::Failure(a), Async::Failure(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
