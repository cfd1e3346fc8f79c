//! Concurrent roster storage with per-activity fine-grained locking.
//!
//! [`ActivityRegistry`] stores all activities in a `HashMap` where each
//! entry is individually protected by a [`tokio::sync::RwLock`]. This
//! allows concurrent reads on the same activity and concurrent writes on
//! different activities, while writes to one activity are serialized.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;

use super::activity_entry::{ActivityEntry, ActivityView};
use crate::error::GatewayError;

/// Central store for all live activity rosters, keyed by activity name.
///
/// Uses a `RwLock<HashMap<...>>` for the outer map and per-entry
/// `Arc<RwLock<ActivityEntry>>` for fine-grained per-activity locking.
///
/// # Concurrency
///
/// - Multiple tasks may read the same activity concurrently.
/// - Mutations on different activities are concurrent.
/// - Mutations on the same activity are serialized, so the capacity and
///   duplicate-email checks and the write they guard are one critical
///   section.
#[derive(Debug)]
pub struct ActivityRegistry {
    activities: RwLock<HashMap<String, Arc<RwLock<ActivityEntry>>>>,
}

impl ActivityRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            activities: RwLock::new(HashMap::new()),
        }
    }

    /// Inserts a new activity into the registry.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ActivityExists`] if an activity with the
    /// same name is already registered.
    pub async fn insert(&self, entry: ActivityEntry) -> Result<(), GatewayError> {
        let mut map = self.activities.write().await;
        if map.contains_key(&entry.name) {
            return Err(GatewayError::ActivityExists(entry.name));
        }
        map.insert(entry.name.clone(), Arc::new(RwLock::new(entry)));
        Ok(())
    }

    /// Returns a shared handle to the activity behind its per-entry lock.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ActivityNotFound`] if no activity with the
    /// given name exists.
    pub async fn get(&self, name: &str) -> Result<Arc<RwLock<ActivityEntry>>, GatewayError> {
        let map = self.activities.read().await;
        map.get(name)
            .cloned()
            .ok_or_else(|| GatewayError::ActivityNotFound(name.to_string()))
    }

    /// Returns read-model views of all activities, keyed by name.
    pub async fn list(&self) -> BTreeMap<String, ActivityView> {
        let map = self.activities.read().await;
        let mut views = BTreeMap::new();
        for (name, entry_lock) in map.iter() {
            let entry = entry_lock.read().await;
            views.insert(name.clone(), ActivityView::from(&*entry));
        }
        views
    }

    /// Returns the number of registered activities.
    pub async fn len(&self) -> usize {
        self.activities.read().await.len()
    }

    /// Returns `true` if the registry contains no activities.
    pub async fn is_empty(&self) -> bool {
        self.activities.read().await.is_empty()
    }
}

impl Default for ActivityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_entry(name: &str) -> ActivityEntry {
        ActivityEntry::new(name, "A test activity", "Fridays, 3:30 PM", 12)
    }

    #[tokio::test]
    async fn insert_and_get() {
        let registry = ActivityRegistry::new();
        let result = registry.insert(make_entry("Chess Club")).await;
        assert!(result.is_ok());

        let fetched = registry.get("Chess Club").await;
        assert!(fetched.is_ok());
    }

    #[tokio::test]
    async fn insert_duplicate_name_fails() {
        let registry = ActivityRegistry::new();
        let _ = registry.insert(make_entry("Chess Club")).await;

        let result = registry.insert(make_entry("Chess Club")).await;
        let Err(err) = result else {
            panic!("expected duplicate insert to fail");
        };
        assert!(matches!(err, GatewayError::ActivityExists(_)));
    }

    #[tokio::test]
    async fn get_nonexistent_returns_error() {
        let registry = ActivityRegistry::new();
        let result = registry.get("No Such Club").await;
        assert!(matches!(result, Err(GatewayError::ActivityNotFound(_))));
    }

    #[tokio::test]
    async fn list_returns_all_keyed_by_name() {
        let registry = ActivityRegistry::new();
        let _ = registry.insert(make_entry("Chess Club")).await;
        let _ = registry.insert(make_entry("Art Club")).await;

        let views = registry.list().await;
        assert_eq!(views.len(), 2);
        assert!(views.contains_key("Chess Club"));
        assert!(views.contains_key("Art Club"));
    }

    #[tokio::test]
    async fn len_and_is_empty() {
        let registry = ActivityRegistry::new();
        assert!(registry.is_empty().await);
        assert_eq!(registry.len().await, 0);

        let _ = registry.insert(make_entry("Chess Club")).await;
        assert!(!registry.is_empty().await);
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn writes_to_different_activities_are_independent() {
        let registry = Arc::new(ActivityRegistry::new());
        let _ = registry.insert(make_entry("Chess Club")).await;
        let _ = registry.insert(make_entry("Math Club")).await;

        let chess = registry.get("Chess Club").await;
        let math = registry.get("Math Club").await;
        let (Ok(chess), Ok(math)) = (chess, math) else {
            panic!("expected both activities");
        };

        // Holding a write lock on one entry must not block the other.
        let _chess_guard = chess.write().await;
        let math_guard = math.try_write();
        assert!(math_guard.is_ok());
    }
}
