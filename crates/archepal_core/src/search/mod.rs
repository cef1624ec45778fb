//! Filter and ranking over cached site lists.
//!
//! # Responsibility
//! - Case-insensitive text filtering that preserves input order.
//! - Recency derivation and date humanization against an explicit `now`.
//! - Explore view shaping for presentation.
//!
//! # Invariants
//! - Everything here is a pure projection; inputs are never mutated.

pub mod explore;
pub mod filter;
pub mod recency;
