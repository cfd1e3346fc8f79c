//! WebSocket layer: the notification gateway.
//!
//! The endpoint at `/ws` delivers the roster event stream, one JSON
//! object per event, to each connected subscriber independently.

pub mod connection;
pub mod handler;
pub mod subscription;
