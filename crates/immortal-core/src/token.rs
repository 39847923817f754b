//! Access token type and in-memory token store.

use std::sync::{Arc, RwLock};

/// A short-lived bearer credential for authenticating API calls.
///
/// The token value is opaque to the client; validity is determined
/// empirically by server responses.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Create an access token from a raw string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

/// Process-wide holder of the current access token.
///
/// Lives only in memory for the lifetime of the process; never persisted.
/// Cloning produces another handle to the same slot, so a store can be
/// shared between a client and the code that observes it in tests.
///
/// Mutation is always a full replace, so there are no read-modify-write
/// races: the last writer wins, and each writer (login, register, refresh,
/// logout) carries the authoritative latest credential.
#[derive(Clone, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<Option<AccessToken>>>,
}

impl TokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored token.
    pub fn set(&self, token: AccessToken) {
        *self.inner.write().unwrap() = Some(token);
    }

    /// Clear the stored token. Subsequent requests go out unauthenticated.
    pub fn clear(&self) {
        *self.inner.write().unwrap() = None;
    }

    /// Returns a snapshot of the current token, if any.
    pub fn get(&self) -> Option<AccessToken> {
        self.inner.read().unwrap().clone()
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let held = self.inner.read().unwrap().is_some();
        f.debug_struct("TokenStore").field("held", &held).finish()
    }
}
