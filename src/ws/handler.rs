//! Axum WebSocket upgrade handler.

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use super::connection::run_connection;
use super::subscription::SubscriptionFilter;
use crate::app_state::AppState;

/// Query parameters for the `/ws` endpoint.
#[derive(Debug, Deserialize)]
pub struct WsParams {
    /// Optional comma-separated activity names to narrow the feed.
    #[serde(default)]
    pub activities: Option<String>,
}

/// `GET /ws` — Upgrade HTTP connection to a WebSocket event stream.
///
/// The bus subscription is taken before the upgrade completes, so no
/// event published after the handshake is missed; events published
/// before it are never replayed.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let event_rx = state.event_bus.subscribe();
    let filter = SubscriptionFilter::from_query(params.activities.as_deref());
    let send_timeout = state.ws_send_timeout;

    ws.on_upgrade(move |socket| run_connection(socket, event_rx, filter, send_timeout))
}
