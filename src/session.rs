//! Volatile, in-memory cache for values the UI must keep while its windows
//! come and go (typically the master secret).
//!
//! Nothing here is ever written to durable storage. Values are wiped on
//! overwrite, removal and drop.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use zeroize::Zeroizing;

/// Process-lifetime key/value store for secrets
#[derive(Default)]
pub struct SessionCache {
    entries: Mutex<HashMap<String, Zeroizing<String>>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key` when given, then return the current value.
    ///
    /// `cache(key, None)` is a pure read.
    pub fn cache(&self, key: &str, value: Option<&str>) -> Option<Zeroizing<String>> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = value {
            entries.insert(key.to_string(), Zeroizing::new(value.to_string()));
        }
        entries.get(key).cloned()
    }

    /// Remove and wipe one entry. Returns whether it existed.
    pub fn forget(&self, key: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some()
    }

    /// Wipe every entry.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCache")
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_without_value() {
        let cache = SessionCache::new();
        assert!(cache.cache("masterPassword", None).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_store_then_read() {
        let cache = SessionCache::new();
        let stored = cache.cache("masterPassword", Some("Password")).unwrap();
        assert_eq!(stored.as_str(), "Password");

        let read = cache.cache("masterPassword", None).unwrap();
        assert_eq!(read.as_str(), "Password");
    }

    #[test]
    fn test_overwrite_and_forget() {
        let cache = SessionCache::new();
        cache.cache("masterPassword", Some("first"));
        cache.cache("masterPassword", Some("second"));
        assert_eq!(cache.cache("masterPassword", None).unwrap().as_str(), "second");
        assert_eq!(cache.len(), 1);

        assert!(cache.forget("masterPassword"));
        assert!(!cache.forget("masterPassword"));
        assert!(cache.cache("masterPassword", None).is_none());
    }

    #[test]
    fn test_clear() {
        let cache = SessionCache::new();
        cache.cache("a", Some("1"));
        cache.cache("b", Some("2"));
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_debug_hides_values() {
        let cache = SessionCache::new();
        cache.cache("masterPassword", Some("Password"));
        let rendered = format!("{cache:?}");
        assert!(!rendered.contains("Password"));
    }
}
