//! In-memory result store
//!
//! Maps the identifier a caller submitted (an email or a domain) to the JSON
//! result cached for it. Every operation takes the lock once, so each call is
//! atomic with respect to concurrent requests. Last write wins.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde_json::Value;
use tracing::debug;

#[derive(Debug, Default)]
pub struct ResultStore {
    results: RwLock<HashMap<String, Value>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `key`, silently replacing any previous value.
    pub fn create(&self, key: &str, value: Value) {
        let previous = self
            .results
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);

        if previous.is_some() {
            debug!("Overwrote stored result for '{}'", key);
        }
    }

    pub fn read(&self, key: &str) -> Option<Value> {
        self.results
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Replace the value under `key`. Returns `false` and changes nothing if the key is absent.
    pub fn update(&self, key: &str, new_value: Value) -> bool {
        let mut results = self.results.write().unwrap_or_else(PoisonError::into_inner);
        match results.get_mut(key) {
            Some(slot) => {
                *slot = new_value;
                true
            }
            None => {
                debug!("Result with key '{}' does not exist", key);
                false
            }
        }
    }

    /// Remove `key`. Returns `false` if it was not present.
    pub fn delete(&self, key: &str) -> bool {
        let removed = self
            .results
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some();

        if !removed {
            debug!("Result with key '{}' does not exist", key);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_read_unknown_key_is_absent() {
        let store = ResultStore::new();
        assert_eq!(store.read("nobody@example.com"), None);
    }

    #[test]
    fn test_read_after_create() {
        let store = ResultStore::new();
        store.create("test@example.com", json!({"result": "deliverable"}));
        assert_eq!(
            store.read("test@example.com"),
            Some(json!({"result": "deliverable"}))
        );
    }

    #[test]
    fn test_create_overwrites_silently() {
        let store = ResultStore::new();
        store.create("stripe.com", json!({"emails": []}));
        store.create("stripe.com", json!({"emails": ["a@stripe.com"]}));
        assert_eq!(
            store.read("stripe.com"),
            Some(json!({"emails": ["a@stripe.com"]}))
        );
    }

    #[test]
    fn test_update_absent_key_fails_and_leaves_store_unchanged() {
        let store = ResultStore::new();
        assert!(!store.update("ghost@example.com", json!({"result": "risky"})));
        assert_eq!(store.read("ghost@example.com"), None);
    }

    #[test]
    fn test_update_present_key() {
        let store = ResultStore::new();
        store.create("test@example.com", json!({"result": "deliverable"}));
        assert!(store.update("test@example.com", json!({"result": "risky"})));
        assert_eq!(store.read("test@example.com"), Some(json!({"result": "risky"})));
    }

    #[test]
    fn test_delete() {
        let store = ResultStore::new();
        assert!(!store.delete("test@example.com"));

        store.create("test@example.com", json!({"result": "deliverable"}));
        assert!(store.delete("test@example.com"));
        assert_eq!(store.read("test@example.com"), None);
        assert!(!store.delete("test@example.com"));
    }

    #[test]
    fn test_falsy_values_are_still_present() {
        let store = ResultStore::new();
        store.create("empty.com", json!({}));
        assert_eq!(store.read("empty.com"), Some(json!({})));
    }

    #[test]
    fn test_concurrent_writers() {
        let store = Arc::new(ResultStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for j in 0..100 {
                        store.create(&format!("key-{}-{}", i, j), json!(j));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        for i in 0..8 {
            assert_eq!(store.read(&format!("key-{}-99", i)), Some(json!(99)));
        }
    }
}
