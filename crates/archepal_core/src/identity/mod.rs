//! Identity provider boundary.
//!
//! # Responsibility
//! - Consume the external identity provider as an opaque "current identity"
//!   signal.
//! - Publish identity transitions to listeners and async watchers.
//!
//! # Invariants
//! - Provider faults never escape as errors from `current_identity`; they read
//!   as "no identity".
//! - Subscribers are only notified when the identity actually changes.

pub mod facade;
pub mod provider;
