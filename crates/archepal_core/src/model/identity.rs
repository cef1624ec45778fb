//! Identity and archaeologist profile models.
//!
//! # Invariants
//! - `IdentityId` is the provider's stable user id; this crate never mints one.
//! - Identity lifetime belongs to the external provider.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Creator reference recorded when no identity is known.
pub const ANONYMOUS_CREATOR: &str = "anonymous";

/// Stable user id issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(String);

impl IdentityId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn anonymous() -> Self {
        Self(ANONYMOUS_CREATOR.to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether this is the placeholder recorded for documents without a creator.
    pub fn is_anonymous(&self) -> bool {
        self.0 == ANONYMOUS_CREATOR
    }
}

impl Display for IdentityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IdentityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for IdentityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Signed-in user as exposed by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: IdentityId,
    pub email: String,
}

impl Identity {
    pub fn new(id: impl Into<IdentityId>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }
}

/// Entry in the `archaeologists` registry, keyed by identity id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchaeologistProfile {
    pub identity_id: IdentityId,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}
