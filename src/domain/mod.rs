//! Domain layer: roster model, activity registry, and event system.
//!
//! This module contains the server-side domain model including the
//! activity aggregate with its roster invariants, the event bus for
//! broadcasting committed changes, and the activity registry for
//! concurrent roster storage.

pub mod activity_entry;
pub mod activity_registry;
pub mod event_bus;
pub mod roster_event;
pub mod seed;

pub use activity_entry::{ActivityDetails, ActivityEntry, ActivityView, Participant};
pub use activity_registry::ActivityRegistry;
pub use event_bus::EventBus;
pub use roster_event::RosterEvent;
