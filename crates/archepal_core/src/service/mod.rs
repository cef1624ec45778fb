//! Core use-case services.
//!
//! # Responsibility
//! - Resolve archaeologist roles and gate create operations on them.
//! - Orchestrate record store calls into create/list use-cases.
//! - Hold per-view list caches fed by those use-cases.

pub mod mutation_gate;
pub mod record_cache;
pub mod record_client;
pub mod role_resolver;
