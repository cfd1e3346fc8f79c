//! Database row models for activities and participants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An activity row from the `activities` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Row ID.
    pub id: Uuid,
    /// Unique activity name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Meeting schedule as free text.
    pub schedule: String,
    /// Roster capacity.
    pub max_participants: i32,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A participant row from the `participants` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantRecord {
    /// Owning activity row ID.
    pub activity_id: Uuid,
    /// Student email, unique within the activity.
    pub email: String,
    /// Optional display name.
    pub name: Option<String>,
    /// Optional grade level.
    pub grade: Option<i32>,
    /// Enrollment timestamp.
    pub signed_up_at: DateTime<Utc>,
}
