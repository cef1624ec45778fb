//! Record store client use-cases.
//!
//! # Responsibility
//! - Provide the create/list entry points presentation code calls.
//! - Order checks so that invalid or unauthorized writes never reach the store.
//! - Stamp store-owned fields (`created_at`, `created_by`).
//!
//! # Invariants
//! - Validation runs before authorization, and both run before any store call.
//! - `created_by` is the identity the permit was issued for.
//! - Failures are returned once; nothing here retries.

use crate::clock::Clock;
use crate::model::artifact::{Artifact, ArtifactDraft, ArtifactId, ArtifactValidationError};
use crate::model::site::{Site, SiteDraft, SiteId, SiteValidationError};
use crate::repo::record_store::{CreationStamp, RecordStore, StoreError};
use crate::service::mutation_gate::{AuthorizationError, CreateAuthorizer, CreatePermit};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Input rejected before any store call.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    Site(SiteValidationError),
    Artifact(ArtifactValidationError),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Site(err) => write!(f, "{err}"),
            Self::Artifact(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Site(err) => Some(err),
            Self::Artifact(err) => Some(err),
        }
    }
}

/// Error surface of [`RecordStoreClient`].
#[derive(Debug)]
pub enum RecordError {
    Validation(ValidationError),
    Authorization(AuthorizationError),
    Persistence(StoreError),
    /// An artifact referenced a site that does not exist.
    SiteNotFound(SiteId),
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "validation failed: {err}"),
            Self::Authorization(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "{err}"),
            Self::SiteNotFound(id) => write!(f, "site not found: {id}"),
        }
    }
}

impl Error for RecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Authorization(err) => Some(err),
            Self::Persistence(err) => Some(err),
            Self::SiteNotFound(_) => None,
        }
    }
}

impl From<SiteValidationError> for RecordError {
    fn from(value: SiteValidationError) -> Self {
        Self::Validation(ValidationError::Site(value))
    }
}

impl From<ArtifactValidationError> for RecordError {
    fn from(value: ArtifactValidationError) -> Self {
        Self::Validation(ValidationError::Artifact(value))
    }
}

impl From<AuthorizationError> for RecordError {
    fn from(value: AuthorizationError) -> Self {
        Self::Authorization(value)
    }
}

impl From<StoreError> for RecordError {
    fn from(value: StoreError) -> Self {
        Self::Persistence(value)
    }
}

pub type RecordResult<T> = Result<T, RecordError>;

/// Typed create/list client over a record store.
pub struct RecordStoreClient<S, A> {
    store: S,
    authorizer: A,
    clock: Arc<dyn Clock>,
}

impl<S: RecordStore, A: CreateAuthorizer> RecordStoreClient<S, A> {
    pub fn new(store: S, authorizer: A, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            authorizer,
            clock,
        }
    }

    /// Advisory flag for presentation; writes re-check it independently.
    pub fn can_create(&self) -> bool {
        self.authorizer.can_create()
    }

    /// Creates a site and returns its store-assigned id.
    ///
    /// # Errors
    /// - `Validation` for a blank name/description or bad coordinates.
    /// - `Authorization` when the gate refuses the current identity.
    /// - `Persistence` when the store write fails.
    pub async fn create_site(&self, draft: SiteDraft) -> RecordResult<SiteId> {
        draft.validate()?;
        let permit = self.authorizer.authorize_create()?;
        let stamp = self.stamp(&permit);

        match self.store.insert_site(draft, stamp).await {
            Ok(site) => {
                info!("event=site_create module=service status=ok");
                Ok(site.id)
            }
            Err(err) => {
                warn!("event=site_create module=service status=error error={err}");
                Err(err.into())
            }
        }
    }

    /// Catalogs an artifact under an existing site and links it there.
    ///
    /// The artifact write and the site link are two separate writes. When the
    /// link fails the artifact document stays and the error is returned.
    pub async fn create_artifact(&self, draft: ArtifactDraft) -> RecordResult<ArtifactId> {
        draft.validate()?;
        let permit = self.authorizer.authorize_create()?;

        if self.store.get_site(&draft.site_id).await?.is_none() {
            return Err(RecordError::SiteNotFound(draft.site_id));
        }

        let stamp = self.stamp(&permit);
        let artifact = self.store.insert_artifact(draft, stamp).await?;
        if let Err(err) = self
            .store
            .append_site_artifact(&artifact.site_id, &artifact.id)
            .await
        {
            warn!("event=artifact_link module=service status=error error={err}");
            return Err(err.into());
        }

        info!("event=artifact_create module=service status=ok");
        Ok(artifact.id)
    }

    /// Returns every site in store-native order.
    pub async fn list_sites(&self) -> RecordResult<Vec<Site>> {
        Ok(self.store.list_sites().await?)
    }

    /// Returns every artifact owned by `site_id` in store-native order.
    pub async fn list_artifacts(&self, site_id: &str) -> RecordResult<Vec<Artifact>> {
        Ok(self.store.list_artifacts(site_id).await?)
    }

    fn stamp(&self, permit: &CreatePermit) -> CreationStamp {
        CreationStamp {
            created_at: self.clock.now_epoch_ms(),
            created_by: permit.identity().id.clone(),
        }
    }
}
