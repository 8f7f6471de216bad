//! Read-mostly session token cell.

use std::sync::Arc;

use arc_swap::ArcSwapOption;

/// Shared holder for the session's bearer token.
///
/// The authentication collaborator writes on login/logout; the client reads
/// on every dispatch. Reads are lock-free, and a token swap never blocks
/// in-flight requests.
#[derive(Clone, Default)]
pub struct TokenStore {
    inner: Arc<ArcSwapOption<String>>,
}

impl TokenStore {
    /// Create an empty store (no session).
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored token.
    pub fn set(&self, token: impl Into<String>) {
        self.inner.store(Some(Arc::new(token.into())));
    }

    /// Drop the stored token (logout / session expiry).
    pub fn clear(&self) {
        self.inner.store(None);
    }

    /// Read the current token, if a session is active.
    pub fn get(&self) -> Option<Arc<String>> {
        self.inner.load_full()
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the token itself
        f.debug_struct("TokenStore")
            .field("present", &self.get().is_some())
            .finish()
    }
}
