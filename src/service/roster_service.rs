//! Roster service: enforces enrollment invariants and emits events.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::seed::default_activities;
use crate::domain::{
    ActivityDetails, ActivityEntry, ActivityRegistry, ActivityView, EventBus, Participant,
    RosterEvent,
};
use crate::error::GatewayError;
use crate::persistence::PostgresStore;

/// Partial update for an activity. `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct ActivityUpdate {
    /// Replacement description, if supplied.
    pub description: Option<String>,
    /// Replacement schedule, if supplied.
    pub schedule: Option<String>,
    /// Replacement capacity, if supplied.
    pub max_participants: Option<u32>,
}

/// Orchestration layer for all roster operations.
///
/// Owns references to [`ActivityRegistry`] for live state, [`EventBus`]
/// for event emission, and optionally a [`PostgresStore`] for durability.
/// Every mutation follows the pattern: acquire the per-activity write
/// lock → validate invariants → write through to the store → apply in
/// memory → release the lock → emit the event. The event is published
/// strictly after the mutation committed, never on a failed validation
/// or an aborted store transaction.
#[derive(Debug, Clone)]
pub struct RosterService {
    registry: Arc<ActivityRegistry>,
    event_bus: EventBus,
    store: Option<Arc<PostgresStore>>,
}

impl RosterService {
    /// Creates a new `RosterService` without a persistent store.
    #[must_use]
    pub fn new(registry: Arc<ActivityRegistry>, event_bus: EventBus) -> Self {
        Self {
            registry,
            event_bus,
            store: None,
        }
    }

    /// Attaches a persistent store that mutations write through to.
    #[must_use]
    pub fn with_store(mut self, store: Arc<PostgresStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the inner [`ActivityRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<ActivityRegistry> {
        &self.registry
    }

    /// Signs a student up for an activity and returns the new roster size.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ActivityNotFound`] for an unknown activity,
    /// [`GatewayError::AlreadySignedUp`] for a duplicate email,
    /// [`GatewayError::ActivityFull`] when the roster is at capacity, or a
    /// store error when the write-through fails.
    pub async fn signup(&self, activity_name: &str, email: &str) -> Result<u32, GatewayError> {
        let entry_lock = self.registry.get(activity_name).await?;
        let mut entry = entry_lock.write().await;

        if entry.has_participant(email) {
            return Err(GatewayError::AlreadySignedUp {
                activity: activity_name.to_string(),
                email: email.to_string(),
            });
        }
        if entry.is_full() {
            return Err(GatewayError::ActivityFull(activity_name.to_string()));
        }

        let participant = Participant::new(email);
        if let Some(store) = &self.store {
            store.insert_participant(activity_name, &participant).await?;
        }

        entry.participants.push(participant);
        entry.last_modified_at = Utc::now();
        let participants_count = entry.participant_count();
        let max_participants = entry.max_participants;
        drop(entry);

        let _ = self.event_bus.publish(RosterEvent::Signup {
            activity: activity_name.to_string(),
            email: email.to_string(),
            participants_count,
            max_participants,
        });

        tracing::info!(activity = activity_name, email, participants_count, "signed up");
        Ok(participants_count)
    }

    /// Removes a student from an activity and returns the new roster size.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ActivityNotFound`] for an unknown activity,
    /// [`GatewayError::NotSignedUp`] when the email is not enrolled, or a
    /// store error when the write-through fails.
    pub async fn unregister(&self, activity_name: &str, email: &str) -> Result<u32, GatewayError> {
        let entry_lock = self.registry.get(activity_name).await?;
        let mut entry = entry_lock.write().await;

        let position = entry.participants.iter().position(|p| p.email == email);
        let Some(position) = position else {
            return Err(GatewayError::NotSignedUp {
                activity: activity_name.to_string(),
                email: email.to_string(),
            });
        };

        if let Some(store) = &self.store {
            store.delete_participant(activity_name, email).await?;
        }

        entry.participants.remove(position);
        entry.last_modified_at = Utc::now();
        let participants_count = entry.participant_count();
        let max_participants = entry.max_participants;
        drop(entry);

        let _ = self.event_bus.publish(RosterEvent::Unregister {
            activity: activity_name.to_string(),
            email: email.to_string(),
            participants_count,
            max_participants,
        });

        tracing::info!(activity = activity_name, email, participants_count, "unregistered");
        Ok(participants_count)
    }

    /// Creates a new activity with an empty roster.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] for a zero capacity,
    /// [`GatewayError::ActivityExists`] for a duplicate name, or a store
    /// error when the write-through fails.
    pub async fn create_activity(
        &self,
        name: &str,
        description: &str,
        schedule: &str,
        max_participants: u32,
    ) -> Result<ActivityDetails, GatewayError> {
        if max_participants == 0 {
            return Err(GatewayError::InvalidRequest(
                "max_participants must be positive".to_string(),
            ));
        }

        let entry = ActivityEntry::new(name, description, schedule, max_participants);
        let details = entry.details();

        if let Some(store) = &self.store {
            store.insert_activity(&entry).await?;
        }
        self.registry.insert(entry).await?;

        let _ = self.event_bus.publish(RosterEvent::ActivityCreated {
            name: name.to_string(),
            details: details.clone(),
        });

        tracing::info!(activity = name, max_participants, "activity created");
        Ok(details)
    }

    /// Applies a partial update to an activity and returns the merged
    /// details. Fields left `None` keep their current value.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::ActivityNotFound`] for an unknown activity,
    /// [`GatewayError::InvalidRequest`] when the new capacity is zero or
    /// below the current enrollment, or a store error when the
    /// write-through fails.
    pub async fn update_activity(
        &self,
        name: &str,
        update: ActivityUpdate,
    ) -> Result<ActivityDetails, GatewayError> {
        let entry_lock = self.registry.get(name).await?;
        let mut entry = entry_lock.write().await;

        let mut details = entry.details();
        if let Some(description) = update.description {
            details.description = description;
        }
        if let Some(schedule) = update.schedule {
            details.schedule = schedule;
        }
        if let Some(max_participants) = update.max_participants {
            if max_participants == 0 {
                return Err(GatewayError::InvalidRequest(
                    "max_participants must be positive".to_string(),
                ));
            }
            if max_participants < entry.participant_count() {
                return Err(GatewayError::InvalidRequest(format!(
                    "max_participants {max_participants} is below current enrollment of {}",
                    entry.participant_count()
                )));
            }
            details.max_participants = max_participants;
        }

        if let Some(store) = &self.store {
            store.update_activity(name, &details).await?;
        }

        entry.description = details.description.clone();
        entry.schedule = details.schedule.clone();
        entry.max_participants = details.max_participants;
        entry.last_modified_at = Utc::now();
        drop(entry);

        let _ = self.event_bus.publish(RosterEvent::ActivityUpdated {
            name: name.to_string(),
            details: details.clone(),
        });

        tracing::info!(activity = name, "activity updated");
        Ok(details)
    }

    /// Returns read-model views of all activities, keyed by name.
    pub async fn list_activities(&self) -> std::collections::BTreeMap<String, ActivityView> {
        self.registry.list().await
    }

    /// Hydrates the registry from the store, seeding the default catalog
    /// into an empty store first when `seed` is set. Without a store,
    /// seeds the registry directly. Returns the number of activities
    /// loaded. Seeding emits no events.
    ///
    /// # Errors
    ///
    /// Returns a store error when loading or seeding fails.
    pub async fn load_or_seed(&self, seed: bool) -> Result<usize, GatewayError> {
        if let Some(store) = &self.store {
            if seed && store.count_activities().await? == 0 {
                store.seed_activities(&default_activities()).await?;
            }
            let entries = store.fetch_all_activities().await?;
            let mut loaded = 0;
            for entry in entries {
                self.registry.insert(entry).await?;
                loaded += 1;
            }
            Ok(loaded)
        } else if seed && self.registry.is_empty().await {
            let defaults = default_activities();
            let loaded = defaults.len();
            for entry in defaults {
                self.registry.insert(entry).await?;
            }
            Ok(loaded)
        } else {
            Ok(0)
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_service() -> RosterService {
        let registry = Arc::new(ActivityRegistry::new());
        let event_bus = EventBus::new(1000);
        RosterService::new(registry, event_bus)
    }

    async fn make_seeded_service() -> RosterService {
        let service = make_service();
        let Ok(_) = service.load_or_seed(true).await else {
            panic!("seeding failed");
        };
        service
    }

    #[tokio::test]
    async fn signup_returns_count_and_emits_event() {
        let service = make_seeded_service().await;
        let mut rx = service.event_bus().subscribe();

        let result = service.signup("Chess Club", "a@x.edu").await;
        let Ok(count) = result else {
            panic!("signup failed");
        };
        assert_eq!(count, 1);

        let Ok(event) = rx.recv().await else {
            panic!("expected signup event");
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(json.get("type").and_then(|v| v.as_str()), Some("signup"));
        assert_eq!(
            json.get("activity").and_then(|v| v.as_str()),
            Some("Chess Club")
        );
        assert_eq!(json.get("email").and_then(|v| v.as_str()), Some("a@x.edu"));
        assert_eq!(
            json.get("participants_count").and_then(|v| v.as_u64()),
            Some(1)
        );
        assert_eq!(
            json.get("max_participants").and_then(|v| v.as_u64()),
            Some(12)
        );
    }

    #[tokio::test]
    async fn duplicate_signup_fails_without_event() {
        let service = make_seeded_service().await;
        let _ = service.signup("Chess Club", "a@x.edu").await;

        let mut rx = service.event_bus().subscribe();
        let result = service.signup("Chess Club", "a@x.edu").await;
        assert!(matches!(result, Err(GatewayError::AlreadySignedUp { .. })));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn signup_unknown_activity_fails() {
        let service = make_seeded_service().await;
        let result = service.signup("No Such Club", "a@x.edu").await;
        assert!(matches!(result, Err(GatewayError::ActivityNotFound(_))));
    }

    #[tokio::test]
    async fn thirteenth_signup_on_full_chess_club_fails_without_event() {
        let service = make_seeded_service().await;
        for i in 0..12 {
            let Ok(_) = service.signup("Chess Club", &format!("s{i}@x.edu")).await else {
                panic!("seed signup {i} failed");
            };
        }

        let mut rx = service.event_bus().subscribe();
        let result = service.signup("Chess Club", "late@x.edu").await;
        assert!(matches!(result, Err(GatewayError::ActivityFull(_))));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unregister_decrements_and_emits_event() {
        let service = make_seeded_service().await;
        let _ = service.signup("Chess Club", "a@x.edu").await;

        let mut rx = service.event_bus().subscribe();
        let result = service.unregister("Chess Club", "a@x.edu").await;
        let Ok(count) = result else {
            panic!("unregister failed");
        };
        assert_eq!(count, 0);

        let Ok(event) = rx.recv().await else {
            panic!("expected unregister event");
        };
        assert_eq!(event.event_type_str(), "unregister");
        assert_eq!(event.activity_name(), "Chess Club");
    }

    #[tokio::test]
    async fn unregister_not_enrolled_fails_without_event() {
        let service = make_seeded_service().await;

        let mut rx = service.event_bus().subscribe();
        let result = service.unregister("Chess Club", "ghost@x.edu").await;
        assert!(matches!(result, Err(GatewayError::NotSignedUp { .. })));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn create_activity_emits_event_with_details() {
        let service = make_service();
        let mut rx = service.event_bus().subscribe();

        let result = service
            .create_activity("Robotics Club", "Build robots", "Wednesdays", 10)
            .await;
        assert!(result.is_ok());

        let Ok(event) = rx.recv().await else {
            panic!("expected activity_created event");
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(
            json.get("type").and_then(|v| v.as_str()),
            Some("activity_created")
        );
        assert_eq!(
            json.get("name").and_then(|v| v.as_str()),
            Some("Robotics Club")
        );
        assert_eq!(
            json.pointer("/details/schedule").and_then(|v| v.as_str()),
            Some("Wednesdays")
        );
    }

    #[tokio::test]
    async fn create_duplicate_activity_fails() {
        let service = make_seeded_service().await;
        let result = service
            .create_activity("Chess Club", "Again", "Fridays", 12)
            .await;
        assert!(matches!(result, Err(GatewayError::ActivityExists(_))));
    }

    #[tokio::test]
    async fn create_activity_rejects_zero_capacity() {
        let service = make_service();
        let result = service.create_activity("Empty Club", "Nothing", "Never", 0).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn update_merges_only_supplied_fields() {
        let service = make_seeded_service().await;
        let mut rx = service.event_bus().subscribe();

        let update = ActivityUpdate {
            description: Some("Updated Gym Description".to_string()),
            ..ActivityUpdate::default()
        };
        let result = service.update_activity("Gym Class", update).await;
        let Ok(details) = result else {
            panic!("update failed");
        };

        assert_eq!(details.description, "Updated Gym Description");
        assert_eq!(
            details.schedule,
            "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM"
        );
        assert_eq!(details.max_participants, 30);

        let Ok(event) = rx.recv().await else {
            panic!("expected activity_updated event");
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap_or_default();
        assert_eq!(
            json.get("type").and_then(|v| v.as_str()),
            Some("activity_updated")
        );
        assert_eq!(
            json.pointer("/details/description").and_then(|v| v.as_str()),
            Some("Updated Gym Description")
        );
        assert_eq!(
            json.pointer("/details/max_participants")
                .and_then(|v| v.as_u64()),
            Some(30)
        );
    }

    #[tokio::test]
    async fn update_unknown_activity_fails() {
        let service = make_seeded_service().await;
        let result = service
            .update_activity("No Such Club", ActivityUpdate::default())
            .await;
        assert!(matches!(result, Err(GatewayError::ActivityNotFound(_))));
    }

    #[tokio::test]
    async fn update_cannot_shrink_capacity_below_enrollment() {
        let service = make_seeded_service().await;
        let _ = service.signup("Math Club", "a@x.edu").await;
        let _ = service.signup("Math Club", "b@x.edu").await;

        let update = ActivityUpdate {
            max_participants: Some(1),
            ..ActivityUpdate::default()
        };
        let result = service.update_activity("Math Club", update).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn mutations_emit_events_in_commit_order() {
        let service = make_seeded_service().await;
        let mut rx = service.event_bus().subscribe();

        let _ = service.signup("Chess Club", "a@x.edu").await;
        let _ = service.signup("Chess Club", "b@x.edu").await;
        let _ = service.unregister("Chess Club", "a@x.edu").await;

        let mut counts = Vec::new();
        for _ in 0..3 {
            let Ok(event) = rx.recv().await else {
                panic!("missing event");
            };
            let json: serde_json::Value = serde_json::to_value(&event).unwrap_or_default();
            counts.push((
                json.get("type")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string(),
                json.get("participants_count").and_then(|v| v.as_u64()),
            ));
        }
        assert_eq!(
            counts,
            vec![
                ("signup".to_string(), Some(1)),
                ("signup".to_string(), Some(2)),
                ("unregister".to_string(), Some(1)),
            ]
        );
    }

    #[tokio::test]
    async fn concurrent_signups_never_exceed_capacity() {
        let service = make_service();
        let Ok(_) = service.create_activity("Tiny Club", "Small", "Sometime", 2).await else {
            panic!("create failed");
        };

        let mut handles = Vec::new();
        for i in 0..8 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.signup("Tiny Club", &format!("s{i}@x.edu")).await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            let Ok(result) = handle.await else {
                panic!("task panicked");
            };
            if result.is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 2);

        let views = service.list_activities().await;
        let Some(view) = views.get("Tiny Club") else {
            panic!("activity missing");
        };
        assert_eq!(view.participants.len(), 2);
    }

    #[tokio::test]
    async fn seeding_emits_no_events() {
        let service = make_service();
        let mut rx = service.event_bus().subscribe();
        let Ok(loaded) = service.load_or_seed(true).await else {
            panic!("seeding failed");
        };
        assert_eq!(loaded, 9);
        assert!(rx.try_recv().is_err());
    }
}
