//! Create-authorization gate.
//!
//! # Responsibility
//! - Combine the current identity with its archaeologist status into one
//!   `can_create` decision.
//! - Issue [`CreatePermit`]s that the record client requires before writing.
//!
//! # Invariants
//! - `can_create` is false without an identity, whatever status is cached.
//! - A status computed for a different identity never authorizes.
//! - This gate is advisory. The document store's own access rules are the
//!   authoritative check; this crate does not implement them.

use crate::identity::facade::IdentityFacade;
use crate::identity::provider::IdentityProvider;
use crate::model::identity::Identity;
use crate::repo::record_store::ArchaeologistRegistry;
use crate::service::role_resolver::{ArchaeologistStatus, RoleResolver};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Why a create attempt was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    SignedOut,
    /// The role lookup for the current identity has not settled yet.
    VerificationPending,
    /// The cached role status belongs to another identity.
    StaleVerification,
    /// The role lookup failed; treated as not authorized.
    VerificationFailed(String),
    NotArchaeologist,
}

impl Display for AuthorizationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SignedOut => write!(
                f,
                "Please sign in as an archaeologist to create archaeological sites."
            ),
            Self::VerificationPending | Self::StaleVerification => {
                write!(f, "Archaeologist verification is still in progress.")
            }
            Self::VerificationFailed(reason) => {
                write!(f, "Archaeologist status could not be verified: {reason}")
            }
            Self::NotArchaeologist => write!(f, "Only verified archaeologists can create sites."),
        }
    }
}

impl Error for AuthorizationError {}

/// Proof that a create was authorized for a specific identity.
///
/// Only an authorizer in this crate can mint one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePermit {
    identity: Identity,
}

impl CreatePermit {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}

/// Authorization contract consumed by the record client.
pub trait CreateAuthorizer: Send + Sync {
    fn authorize_create(&self) -> Result<CreatePermit, AuthorizationError>;

    fn can_create(&self) -> bool {
        self.authorize_create().is_ok()
    }
}

impl<T: CreateAuthorizer + ?Sized> CreateAuthorizer for Arc<T> {
    fn authorize_create(&self) -> Result<CreatePermit, AuthorizationError> {
        (**self).authorize_create()
    }
}

/// Pure gate decision for an identity and its role status.
pub fn evaluate(
    identity: Option<&Identity>,
    status: &ArchaeologistStatus,
) -> Result<CreatePermit, AuthorizationError> {
    let Some(identity) = identity.filter(|identity| !identity.id.is_anonymous()) else {
        return Err(AuthorizationError::SignedOut);
    };
    if !status.is_for(identity) {
        return Err(AuthorizationError::StaleVerification);
    }
    if status.loading {
        return Err(AuthorizationError::VerificationPending);
    }
    if let Some(reason) = &status.error {
        return Err(AuthorizationError::VerificationFailed(reason.clone()));
    }
    if !status.is_archaeologist {
        return Err(AuthorizationError::NotArchaeologist);
    }
    Ok(CreatePermit {
        identity: identity.clone(),
    })
}

/// Gate over a live identity facade and role resolver.
pub struct MutationGate<P, R> {
    identity: Arc<IdentityFacade<P>>,
    roles: Arc<RoleResolver<R>>,
}

impl<P, R> MutationGate<P, R>
where
    P: IdentityProvider,
    R: ArchaeologistRegistry,
{
    pub fn new(identity: Arc<IdentityFacade<P>>, roles: Arc<RoleResolver<R>>) -> Self {
        Self { identity, roles }
    }
}

impl<P, R> CreateAuthorizer for MutationGate<P, R>
where
    P: IdentityProvider,
    R: ArchaeologistRegistry,
{
    fn authorize_create(&self) -> Result<CreatePermit, AuthorizationError> {
        let identity = self.identity.current_identity();
        evaluate(identity.as_ref(), &self.roles.status())
    }
}
