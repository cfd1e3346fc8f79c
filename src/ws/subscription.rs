//! Per-connection subscription filter.
//!
//! Tracks which activities a WebSocket client wants events for and
//! provides server-side event filtering. By default a connection
//! receives every event; an `activities` query parameter narrows the
//! feed to the named activities.

use std::collections::HashSet;

/// Event filter for a single WebSocket connection.
#[derive(Debug)]
pub struct SubscriptionFilter {
    /// Activity names to forward. Ignored when `all` is set.
    names: HashSet<String>,
    /// Whether the connection receives events for every activity.
    all: bool,
}

impl SubscriptionFilter {
    /// Creates a filter that forwards every event.
    #[must_use]
    pub fn all() -> Self {
        Self {
            names: HashSet::new(),
            all: true,
        }
    }

    /// Creates a filter from a comma-separated `activities` query value.
    ///
    /// `None` or an all-whitespace value forwards every event.
    #[must_use]
    pub fn from_query(activities: Option<&str>) -> Self {
        let Some(raw) = activities else {
            return Self::all();
        };
        let names: HashSet<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            return Self::all();
        }
        Self { names, all: false }
    }

    /// Returns `true` if events for the given activity should be forwarded.
    #[must_use]
    pub fn matches(&self, activity_name: &str) -> bool {
        self.all || self.names.contains(activity_name)
    }

    /// Returns the number of explicitly named activities.
    #[must_use]
    pub fn count(&self) -> usize {
        self.names.len()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_everything() {
        let filter = SubscriptionFilter::from_query(None);
        assert!(filter.matches("Chess Club"));
        assert!(filter.matches("Art Club"));
        assert_eq!(filter.count(), 0);
    }

    #[test]
    fn named_filter_matches_only_listed() {
        let filter = SubscriptionFilter::from_query(Some("Chess Club,Art Club"));
        assert!(filter.matches("Chess Club"));
        assert!(filter.matches("Art Club"));
        assert!(!filter.matches("Gym Class"));
        assert_eq!(filter.count(), 2);
    }

    #[test]
    fn whitespace_is_trimmed() {
        let filter = SubscriptionFilter::from_query(Some(" Chess Club , Math Club "));
        assert!(filter.matches("Chess Club"));
        assert!(filter.matches("Math Club"));
    }

    #[test]
    fn empty_value_matches_everything() {
        let filter = SubscriptionFilter::from_query(Some("  ,  "));
        assert!(filter.matches("Debate Team"));
    }

    #[test]
    fn filter_is_exact_match() {
        let filter = SubscriptionFilter::from_query(Some("Chess Club"));
        assert!(!filter.matches("chess club"));
    }
}
