//! Activity-related DTOs for list, signup, create, and update operations.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ActivityDetails;

/// Query parameters for signup and unregister requests.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct SignupParams {
    /// Student email, treated as an opaque exact-match identifier.
    pub email: String,
}

/// Response body for signup and unregister requests.
#[derive(Debug, Serialize, ToSchema)]
pub struct RosterChangeResponse {
    /// Human-readable confirmation.
    pub message: String,
    /// Roster size after the change.
    pub participants_count: u32,
}

/// Request body for `POST /activities`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateActivityRequest {
    /// Unique activity name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Meeting schedule as free text.
    pub schedule: String,
    /// Roster capacity. Must be positive.
    pub max_participants: u32,
}

/// Request body for `PATCH /activities/{name}`. Omitted fields keep
/// their current value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateActivityRequest {
    /// Replacement description.
    #[serde(default)]
    pub description: Option<String>,
    /// Replacement schedule.
    #[serde(default)]
    pub schedule: Option<String>,
    /// Replacement capacity.
    #[serde(default)]
    pub max_participants: Option<u32>,
}

/// Response body for activity create and update requests.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityResponse {
    /// Activity name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Meeting schedule as free text.
    pub schedule: String,
    /// Roster capacity.
    pub max_participants: u32,
}

impl ActivityResponse {
    /// Builds a response from an activity name and its full details.
    #[must_use]
    pub fn from_details(name: String, details: ActivityDetails) -> Self {
        Self {
            name,
            description: details.description,
            schedule: details.schedule,
            max_participants: details.max_participants,
        }
    }
}
