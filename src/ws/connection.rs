//! WebSocket connection lifecycle.
//!
//! Runs the read/write loop for a single subscriber connection: events
//! from the bus are forwarded in publish order, and the connection is
//! torn down on client disconnect, transport error, send timeout, or
//! bus closure. Dropping the receiver unsubscribes the connection, so a
//! closed subscriber receives no further deliveries.

use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use super::subscription::SubscriptionFilter;
use crate::domain::RosterEvent;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Forwards matching events from the [`broadcast::Receiver`] to the
///   client, one JSON object per event.
/// - Reads client frames only to observe disconnects; the notification
///   protocol is consume-only.
/// - A send that exceeds `send_timeout` treats the subscriber as dead.
pub async fn run_connection(
    socket: WebSocket,
    mut event_rx: broadcast::Receiver<RosterEvent>,
    filter: SubscriptionFilter,
    send_timeout: Duration,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Incoming frame from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
            // Event from EventBus
            event = event_rx.recv() => {
                match event {
                    Ok(event) => {
                        if !filter.matches(event.activity_name()) {
                            continue;
                        }
                        let Ok(json) = serde_json::to_string(&event) else {
                            continue;
                        };
                        match tokio::time::timeout(send_timeout, ws_tx.send(Message::text(json))).await {
                            Ok(Ok(())) => {}
                            Ok(Err(_)) => break,
                            Err(_) => {
                                tracing::warn!(
                                    event_type = event.event_type_str(),
                                    "ws send timed out; dropping subscriber"
                                );
                                break;
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}
