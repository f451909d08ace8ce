//! Mock implementations of service traits for testing
//!
//! The in-memory auth and database drivers live in [`crate::drivers`]; this
//! module only holds the configuration double, which needs no guard.

use super::traits::ConfigProvider;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Mock configuration provider for testing
///
/// Clones share the same map, so a test can keep a handle and change values
/// after the provider has been bound into a container.
///
/// # Example
///
/// ```
/// use firekit::di::mocks::MockConfigProvider;
/// use firekit::di::ConfigProvider;
///
/// let config = MockConfigProvider::new().with("FIREBASE_PROJECT_ID", "demo");
/// assert!(config.has("FIREBASE_PROJECT_ID"));
/// assert_eq!(config.get_or("FIREBASE_API_KEY", "none"), "none");
/// ```
#[derive(Clone, Default)]
pub struct MockConfigProvider {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MockConfigProvider {
    /// Create an empty mock configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set)
    pub fn with(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Set a value
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values().insert(key.into(), value.into());
    }

    /// Remove a value
    pub fn remove(&self, key: &str) {
        self.values().remove(key);
    }

    fn values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ConfigProvider for MockConfigProvider {
    fn get(&self, key: &str) -> Option<String> {
        self.values().get(key).cloned()
    }
}
