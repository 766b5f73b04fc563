//! Per-field error message store

use std::collections::BTreeMap;

use dashmap::DashMap;

/// The current error text of every validated field.
///
/// Read by the UI layer, written only by the session when it validates a
/// field, and only for that field's entry.
#[derive(Debug, Default)]
pub struct ErrorMessages {
    messages: DashMap<String, String>,
}

impl ErrorMessages {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            messages: DashMap::new(),
        }
    }

    pub(crate) fn set(&self, field: &str, message: impl Into<String>) {
        self.messages.insert(field.to_string(), message.into());
    }

    /// Returns the current error text of a field.
    ///
    /// `None` if the field was never validated, an empty string if its last
    /// validation passed.
    pub fn get(&self, field: &str) -> Option<String> {
        self.messages.get(field).map(|entry| entry.value().clone())
    }

    /// Returns a copy of every entry, ordered by field name.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.messages
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Returns `true` if any field currently has error text.
    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(|entry| !entry.value().is_empty())
    }

    /// Forgets every field's error text.
    pub fn clear(&self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrites_own_entry() {
        let store = ErrorMessages::new();
        assert_eq!(store.get("email"), None);

        store.set("email", "Required");
        store.set("name", "");
        assert!(store.has_errors());

        store.set("email", "");
        assert_eq!(store.get("email").as_deref(), Some(""));
        assert!(!store.has_errors());
        assert_eq!(store.snapshot().len(), 2);
    }

    #[test]
    fn test_concurrent_writers_keep_their_own_entry() {
        let store = ErrorMessages::new();

        std::thread::scope(|scope| {
            for i in 0..8 {
                let store = &store;
                scope.spawn(move || {
                    let field = format!("field_{}", i);
                    for _ in 0..100 {
                        store.set(&field, format!("error {}", i));
                        store.set(&field, "");
                    }
                    store.set(&field, format!("error {}", i));
                });
            }
        });

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 8);
        for (field, message) in snapshot {
            assert_eq!(field.replace("field_", "error "), message);
        }

        store.clear();
        assert!(!store.has_errors());
        assert_eq!(store.get("field_0"), None);
    }
}
