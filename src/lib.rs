//! # activities-gateway
//!
//! REST API and WebSocket gateway for school extracurricular activity
//! rosters.
//!
//! This crate provides an HTTP interface for listing activities, signing
//! students up, and withdrawing them, plus a WebSocket endpoint that
//! streams every committed roster change to live subscribers. Capacity
//! and duplicate-email invariants are enforced atomically per activity.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Gateway (ws/)
//!     │
//!     ├── RosterService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── ActivityRegistry (domain/)
//!     │
//!     └── PostgreSQL Persistence (optional)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
