//! Key-value persistence behind the session manager.
//!
//! Sessions live in browser localStorage when available. When storage is
//! unavailable (private browsing, embedded webviews) the client degrades to a
//! process-lifetime in-memory map instead of failing.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gloo_storage::{LocalStorage, Storage};

use crate::console_warn;
use crate::errors::AuthError;

/// Minimal key-value persistence contract.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), AuthError>;
    fn remove(&self, key: &str);
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AuthError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

/// Browser localStorage backend.
pub struct LocalStore;

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::get::<String>(key).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AuthError> {
        LocalStorage::set(key, value.to_string()).map_err(|e| AuthError::Storage {
            message: format!("Failed to write '{}' to localStorage: {:?}", key, e),
        })
    }

    fn remove(&self, key: &str) {
        LocalStorage::delete(key);
    }
}

/// Process-lifetime fallback used when localStorage is unavailable.
///
/// Contents are lost on reload. This is the deliberate degraded mode, not an
/// error path.
#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AuthError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

const PROBE_KEY: &str = "genobank_storage_probe";

/// Pick the best available backend: localStorage when writable, otherwise the
/// in-memory fallback.
pub fn detect_store() -> Box<dyn KeyValueStore> {
    let local = LocalStore;
    match local.set(PROBE_KEY, "1") {
        Ok(()) => {
            local.remove(PROBE_KEY);
            Box::new(local)
        }
        Err(_) => {
            console_warn!("localStorage unavailable, falling back to in-memory session storage");
            Box::new(MemoryStore::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.get("missing").is_none());

        store.set("wallet", "0xabc").unwrap();
        assert_eq!(store.get("wallet").as_deref(), Some("0xabc"));

        store.set("wallet", "0xdef").unwrap();
        assert_eq!(store.get("wallet").as_deref(), Some("0xdef"));

        store.remove("wallet");
        assert!(store.get("wallet").is_none());
        // Removing twice is harmless
        store.remove("wallet");
    }

    #[test]
    fn test_shared_store_via_rc() {
        let shared = Rc::new(MemoryStore::new());
        let a: Box<dyn KeyValueStore> = Box::new(shared.clone());
        let b: Box<dyn KeyValueStore> = Box::new(shared);

        a.set("key", "value").unwrap();
        assert_eq!(b.get("key").as_deref(), Some("value"));
    }
}
