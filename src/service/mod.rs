//! Service layer: business logic orchestration.
//!
//! [`RosterService`] coordinates roster operations, enforces the capacity
//! and duplicate-email invariants, and emits events through the
//! [`super::domain::EventBus`].

pub mod roster_service;

pub use roster_service::{ActivityUpdate, RosterService};
