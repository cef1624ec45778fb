//! Record store contracts for the remote document store.
//!
//! # Responsibility
//! - Define typed async access to the `sites`, `artifacts` and
//!   `archaeologists` collections.
//! - Define the persistence error surfaced to services.
//!
//! # Invariants
//! - Ids are assigned by the store on insert.
//! - List operations return the full collection in store-native order; callers
//!   re-sort when order matters.
//! - No update or delete of catalog records is exposed.

use crate::db::DbError;
use crate::model::artifact::{Artifact, ArtifactDraft};
use crate::model::identity::{ArchaeologistProfile, IdentityId};
use crate::model::site::{Site, SiteDraft};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::Arc;

pub type StoreResult<T> = Result<T, StoreError>;

/// Remote store fault on read or write.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Serialization(serde_json::Error),
    /// A persisted document could not be decoded into its typed record.
    InvalidData(String),
    /// An update targeted a document that does not exist.
    NotFound {
        collection: &'static str,
        id: String,
    },
    /// Transport-level failure reported by a remote backend.
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "document encoding failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted document: {message}"),
            Self::NotFound { collection, id } => {
                write!(f, "document not found: {collection}/{id}")
            }
            Self::Unavailable(message) => write!(f, "record store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Store-owned fields stamped on a record at creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationStamp {
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub created_by: IdentityId,
}

/// Typed access to catalog collections.
pub trait RecordStore: Send + Sync {
    /// Persists a validated site draft and returns the stored record.
    fn insert_site(
        &self,
        draft: SiteDraft,
        stamp: CreationStamp,
    ) -> impl Future<Output = StoreResult<Site>> + Send;

    fn get_site(&self, id: &str) -> impl Future<Output = StoreResult<Option<Site>>> + Send;

    fn list_sites(&self) -> impl Future<Output = StoreResult<Vec<Site>>> + Send;

    /// Persists a validated artifact draft and returns the stored record.
    fn insert_artifact(
        &self,
        draft: ArtifactDraft,
        stamp: CreationStamp,
    ) -> impl Future<Output = StoreResult<Artifact>> + Send;

    /// Appends an artifact id to the owning site's `artifacts` list.
    ///
    /// Appending an id that is already listed is a no-op.
    fn append_site_artifact(
        &self,
        site_id: &str,
        artifact_id: &str,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    fn list_artifacts(
        &self,
        site_id: &str,
    ) -> impl Future<Output = StoreResult<Vec<Artifact>>> + Send;
}

/// Lookup contract for the archaeologist registry.
pub trait ArchaeologistRegistry: Send + Sync {
    /// Returns the registry entry for `identity_id`, if the identity is a
    /// registered archaeologist.
    fn find_archaeologist(
        &self,
        identity_id: &IdentityId,
    ) -> impl Future<Output = StoreResult<Option<ArchaeologistProfile>>> + Send;

    /// Inserts or replaces one registry entry.
    fn register_archaeologist(
        &self,
        profile: &ArchaeologistProfile,
    ) -> impl Future<Output = StoreResult<()>> + Send;
}

impl<T: RecordStore> RecordStore for Arc<T> {
    fn insert_site(
        &self,
        draft: SiteDraft,
        stamp: CreationStamp,
    ) -> impl Future<Output = StoreResult<Site>> + Send {
        (**self).insert_site(draft, stamp)
    }

    fn get_site(&self, id: &str) -> impl Future<Output = StoreResult<Option<Site>>> + Send {
        (**self).get_site(id)
    }

    fn list_sites(&self) -> impl Future<Output = StoreResult<Vec<Site>>> + Send {
        (**self).list_sites()
    }

    fn insert_artifact(
        &self,
        draft: ArtifactDraft,
        stamp: CreationStamp,
    ) -> impl Future<Output = StoreResult<Artifact>> + Send {
        (**self).insert_artifact(draft, stamp)
    }

    fn append_site_artifact(
        &self,
        site_id: &str,
        artifact_id: &str,
    ) -> impl Future<Output = StoreResult<()>> + Send {
        (**self).append_site_artifact(site_id, artifact_id)
    }

    fn list_artifacts(
        &self,
        site_id: &str,
    ) -> impl Future<Output = StoreResult<Vec<Artifact>>> + Send {
        (**self).list_artifacts(site_id)
    }
}

impl<T: ArchaeologistRegistry> ArchaeologistRegistry for Arc<T> {
    fn find_archaeologist(
        &self,
        identity_id: &IdentityId,
    ) -> impl Future<Output = StoreResult<Option<ArchaeologistProfile>>> + Send {
        (**self).find_archaeologist(identity_id)
    }

    fn register_archaeologist(
        &self,
        profile: &ArchaeologistProfile,
    ) -> impl Future<Output = StoreResult<()>> + Send {
        (**self).register_archaeologist(profile)
    }
}

/// Generates a store-assigned document id.
pub(crate) fn new_document_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
