//! In-memory access token slot

use arc_swap::ArcSwapOption;
use std::sync::Arc;

/// Holder of the current short-lived access token
///
/// Cloning yields another handle onto the same slot. The token is never
/// written to durable storage, so it is gone once the process exits.
#[derive(Clone, Default)]
pub struct TokenStore {
    slot: Arc<ArcSwapOption<String>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the slot; the token shape is not checked
    pub fn set(&self, token: impl Into<String>) {
        self.slot.store(Some(Arc::new(token.into())));
    }

    /// Current token, `None` when there is no active session
    pub fn get(&self) -> Option<String> {
        self.slot
            .load_full()
            .map(|token| token.as_ref().clone())
            .filter(|token| !token.is_empty())
    }

    pub fn clear(&self) {
        self.slot.store(None);
    }

    pub fn is_empty(&self) -> bool {
        self.get().is_none()
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("present", &!self.is_empty())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        assert_eq!(TokenStore::new().get(), None);
    }

    #[test]
    fn set_overwrites_and_is_shared_between_clones() {
        let store = TokenStore::new();
        let handle = store.clone();
        store.set("first");
        handle.set("second");
        assert_eq!(store.get().as_deref(), Some("second"));
        store.clear();
        assert!(handle.is_empty());
    }

    #[test]
    fn empty_string_counts_as_absent() {
        let store = TokenStore::new();
        store.set("");
        assert!(store.is_empty());
    }
}
