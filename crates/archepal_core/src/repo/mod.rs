//! Repository layer: document store contracts and implementations.
//!
//! # Responsibility
//! - Define async, typed data access for catalog collections.
//! - Isolate SQLite/JSON details from service orchestration.
//!
//! # Invariants
//! - Repositories never validate authorization; that is the service layer's
//!   advisory gate plus the store's own access rules.
//! - Repository reads return semantic decode errors instead of skipping rows.

pub mod record_store;
pub mod sqlite_store;
