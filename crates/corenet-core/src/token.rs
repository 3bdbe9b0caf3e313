//! Bearer token capability.
//!
//! The HTTP client never caches tokens. It asks its [`TokenStore`] for the
//! current token every time a request is about to be sent, so whoever owns
//! the store can rotate or clear credentials between calls.

use secrecy::SecretString;
use std::sync::RwLock;

/// Synchronous source of the current bearer token.
///
/// Returning `None` means no token is available; the request is then sent
/// without an `Authorization` header.
///
/// Any `Fn() -> Option<String>` closure is a token store:
///
/// ```rust
/// use corenet_core::TokenStore;
///
/// let store = || Some("token-123".to_string());
/// assert!(store.token().is_some());
/// ```
pub trait TokenStore: Send + Sync {
    /// Read the token to attach to the next request.
    fn token(&self) -> Option<SecretString>;
}

impl<F> TokenStore for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn token(&self) -> Option<SecretString> {
        self().map(|token| SecretString::new(token.into_boxed_str()))
    }
}

/// In-memory token store that can be updated while clients hold it.
///
/// # Example
///
/// ```rust
/// use corenet_core::{MemoryTokenStore, TokenStore};
/// use secrecy::ExposeSecret;
///
/// let store = MemoryTokenStore::new();
/// assert!(store.token().is_none());
///
/// store.set_token("fresh");
/// assert_eq!(store.token().unwrap().expose_secret(), "fresh");
/// ```
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<SecretString>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.set_token(token);
        store
    }

    /// Replace the stored token.
    pub fn set_token(&self, token: impl Into<String>) {
        let secret = SecretString::new(token.into().into_boxed_str());
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(secret);
    }

    /// Remove the stored token.
    pub fn clear(&self) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<SecretString> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
