//! Catalog domain model for sites, artifacts and identities.
//!
//! # Responsibility
//! - Define canonical record shapes shared by the store, caches and search.
//! - Validate create input before it can reach the store.
//!
//! # Invariants
//! - Records are identified by store-assigned string ids.
//! - Records are never physically deleted; sites archive through `status`.
//! - Timestamps are Unix epoch milliseconds.

pub mod artifact;
pub mod identity;
pub mod site;
