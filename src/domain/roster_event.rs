//! Domain events reflecting committed roster mutations.
//!
//! Every successful mutation emits exactly one [`RosterEvent`] through the
//! [`super::EventBus`] after its transaction commits. Events are ephemeral:
//! they are broadcast to connected WebSocket subscribers and never persisted.

use serde::Serialize;

use super::ActivityDetails;

/// Domain event emitted after a committed state transition.
///
/// Serializes to the wire format consumed by WebSocket subscribers, one
/// JSON object per event with a `type` discriminator, e.g.:
///
/// ```json
/// {"type":"signup","activity":"Chess Club","email":"a@x.edu",
///  "participants_count":1,"max_participants":12}
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RosterEvent {
    /// A student enrolled in an activity.
    Signup {
        /// Activity name.
        activity: String,
        /// Enrolled student email.
        email: String,
        /// Roster size after the signup.
        participants_count: u32,
        /// Roster capacity.
        max_participants: u32,
    },

    /// A student withdrew from an activity.
    Unregister {
        /// Activity name.
        activity: String,
        /// Withdrawn student email.
        email: String,
        /// Roster size after the withdrawal.
        participants_count: u32,
        /// Roster capacity.
        max_participants: u32,
    },

    /// A new activity was created.
    ActivityCreated {
        /// Activity name.
        name: String,
        /// Full details of the created activity.
        details: ActivityDetails,
    },

    /// An existing activity's details were updated.
    ActivityUpdated {
        /// Activity name.
        name: String,
        /// Full details after the merge.
        details: ActivityDetails,
    },
}

impl RosterEvent {
    /// Returns the name of the activity this event concerns.
    #[must_use]
    pub fn activity_name(&self) -> &str {
        match self {
            Self::Signup { activity, .. } | Self::Unregister { activity, .. } => activity,
            Self::ActivityCreated { name, .. } | Self::ActivityUpdated { name, .. } => name,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::Signup { .. } => "signup",
            Self::Unregister { .. } => "unregister",
            Self::ActivityCreated { .. } => "activity_created",
            Self::ActivityUpdated { .. } => "activity_updated",
        }
    }
}
