//! Shared application state injected into all Axum handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::EventBus;
use crate::service::RosterService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Roster service for all business logic.
    pub roster_service: Arc<RosterService>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
    /// Timeout for a single WebSocket send before the subscriber is
    /// treated as dead.
    pub ws_send_timeout: Duration,
}
