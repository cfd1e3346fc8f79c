//! Persistence layer: durable PostgreSQL storage for activity rosters.
//!
//! Provides transactional access to activities and participants. Every
//! roster mutation runs inside a single transaction that locks the
//! activity row, so the capacity and duplicate-email checks are atomic
//! with the write they guard. Events are never persisted.

pub mod models;
pub mod postgres;

pub use postgres::PostgresStore;
