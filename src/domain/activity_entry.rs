//! Roster aggregate: an activity and its enrolled participants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A student's enrollment record in one activity.
///
/// Identity is the (activity name, email) pair. The email is treated as an
/// opaque, case-sensitive exact-match key; no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Student email, exact-match identity within the activity.
    pub email: String,
    /// Optional display name.
    pub name: Option<String>,
    /// Optional grade level.
    pub grade: Option<i32>,
    /// Enrollment timestamp.
    pub signed_up_at: DateTime<Utc>,
}

impl Participant {
    /// Creates a participant with the given email and no optional fields.
    #[must_use]
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            grade: None,
            signed_up_at: Utc::now(),
        }
    }
}

/// Aggregate holding one activity's metadata and current roster.
///
/// Each entry in the [`super::ActivityRegistry`] is stored behind its own
/// `RwLock`, so reads on the same activity are concurrent while writes are
/// serialized. Both invariants — `participants.len() <= max_participants`
/// and no duplicate email — are enforced while that write lock is held.
#[derive(Debug)]
pub struct ActivityEntry {
    /// Unique activity name (immutable after creation).
    pub name: String,

    /// Human-readable description.
    pub description: String,

    /// Meeting schedule as free text.
    pub schedule: String,

    /// Roster capacity. Always positive.
    pub max_participants: u32,

    /// Currently enrolled participants, in signup order.
    pub participants: Vec<Participant>,

    /// Creation timestamp (immutable after creation).
    pub created_at: DateTime<Utc>,

    /// Timestamp of the last roster or metadata mutation.
    pub last_modified_at: DateTime<Utc>,
}

impl ActivityEntry {
    /// Creates a new activity with an empty roster.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        schedule: impl Into<String>,
        max_participants: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            description: description.into(),
            schedule: schedule.into(),
            max_participants,
            participants: Vec::new(),
            created_at: now,
            last_modified_at: now,
        }
    }

    /// Returns the current number of enrolled participants.
    #[must_use]
    pub fn participant_count(&self) -> u32 {
        u32::try_from(self.participants.len()).unwrap_or(u32::MAX)
    }

    /// Returns `true` if the roster is at capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.participant_count() >= self.max_participants
    }

    /// Returns `true` if a participant with the exact email is enrolled.
    #[must_use]
    pub fn has_participant(&self, email: &str) -> bool {
        self.participants.iter().any(|p| p.email == email)
    }

    /// Returns the mutable description/schedule/capacity fields as a
    /// [`ActivityDetails`] value for event payloads and responses.
    #[must_use]
    pub fn details(&self) -> ActivityDetails {
        ActivityDetails {
            description: self.description.clone(),
            schedule: self.schedule.clone(),
            max_participants: self.max_participants,
        }
    }
}

/// The mutable fields of an activity, as carried by `activity_created`
/// and `activity_updated` event payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDetails {
    /// Human-readable description.
    pub description: String,
    /// Meeting schedule as free text.
    pub schedule: String,
    /// Roster capacity.
    pub max_participants: u32,
}

/// Read-model of one activity for `GET /activities` responses.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityView {
    /// Human-readable description.
    pub description: String,
    /// Meeting schedule as free text.
    pub schedule: String,
    /// Roster capacity.
    pub max_participants: u32,
    /// Enrolled participant emails, in signup order.
    pub participants: Vec<String>,
}

impl From<&ActivityEntry> for ActivityView {
    fn from(entry: &ActivityEntry) -> Self {
        Self {
            description: entry.description.clone(),
            schedule: entry.schedule.clone(),
            max_participants: entry.max_participants,
            participants: entry.participants.iter().map(|p| p.email.clone()).collect(),
        }
    }
}
