//! SQLite-backed document store implementation.
//!
//! # Responsibility
//! - Persist catalog records as JSON documents keyed by store-assigned ids.
//! - Serve the archaeologist registry from the same store.
//!
//! # Invariants
//! - Reads reject undecodable documents instead of masking them.
//! - `seq` order is the store-native list order.
//! - Futures complete without suspending; the connection mutex is never held
//!   across an await point.

use crate::clock::now_epoch_ms;
use crate::config::StoreConfig;
use crate::db::{
    open_db, open_db_in_memory, ARCHAEOLOGISTS_COLLECTION, ARTIFACTS_COLLECTION,
    SITES_COLLECTION,
};
use crate::model::artifact::{Artifact, ArtifactDraft};
use crate::model::identity::{ArchaeologistProfile, IdentityId};
use crate::model::site::{Site, SiteDraft};
use crate::repo::record_store::{
    new_document_id, ArchaeologistRegistry, CreationStamp, RecordStore, StoreError, StoreResult,
};
use log::debug;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Document store over one SQLite connection.
pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    /// Wraps a connection returned by [`open_db`] or [`open_db_in_memory`].
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Opens the database file named by `cfg.path`, or an in-memory store
    /// when no path is configured.
    pub fn from_config(cfg: &StoreConfig) -> StoreResult<Self> {
        match &cfg.path {
            Some(path) => Self::open(path),
            None => Self::open_in_memory(),
        }
    }

    fn insert_document<T: Serialize>(
        &self,
        collection: &'static str,
        id: &str,
        created_at: i64,
        body: &T,
    ) -> StoreResult<()> {
        let body = serde_json::to_string(body)?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO documents (collection, id, body, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4);",
            params![collection, id, body, created_at],
        )?;
        debug!("event=store_insert module=repo status=ok collection={collection}");
        Ok(())
    }

    fn upsert_document<T: Serialize>(
        &self,
        collection: &'static str,
        id: &str,
        body: &T,
    ) -> StoreResult<()> {
        let body = serde_json::to_string(body)?;
        let now = now_epoch_ms();
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO documents (collection, id, body, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT (collection, id)
             DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at;",
            params![collection, id, body, now],
        )?;
        Ok(())
    }

    fn get_document<T: DeserializeOwned>(
        &self,
        collection: &'static str,
        id: &str,
    ) -> StoreResult<Option<T>> {
        let conn = self.conn.lock();
        let body = conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2;",
                params![collection, id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        body.map(|body| decode_document(collection, id, &body))
            .transpose()
    }

    fn list_documents<T: DeserializeOwned>(&self, collection: &'static str) -> StoreResult<Vec<T>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT id, body FROM documents
             WHERE collection = ?1
             ORDER BY seq ASC;",
        )?;
        let mut rows = stmt.query(params![collection])?;
        let mut documents = Vec::new();

        while let Some(row) = rows.next()? {
            let id: String = row.get(0)?;
            let body: String = row.get(1)?;
            documents.push(decode_document(collection, &id, &body)?);
        }

        debug!(
            "event=store_list module=repo status=ok collection={} count={}",
            collection,
            documents.len()
        );
        Ok(documents)
    }

    fn append_artifact_ref(&self, site_id: &str, artifact_id: &str) -> StoreResult<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let body = tx
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2;",
                params![SITES_COLLECTION, site_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound {
                collection: SITES_COLLECTION,
                id: site_id.to_string(),
            })?;

        let mut site: Site = decode_document(SITES_COLLECTION, site_id, &body)?;
        if site.artifacts.iter().any(|id| id == artifact_id) {
            return Ok(());
        }
        site.artifacts.push(artifact_id.to_string());

        tx.execute(
            "UPDATE documents SET body = ?3, updated_at = ?4
             WHERE collection = ?1 AND id = ?2;",
            params![
                SITES_COLLECTION,
                site_id,
                serde_json::to_string(&site)?,
                now_epoch_ms()
            ],
        )?;
        tx.commit()?;
        Ok(())
    }
}

impl RecordStore for SqliteRecordStore {
    async fn insert_site(&self, draft: SiteDraft, stamp: CreationStamp) -> StoreResult<Site> {
        let site = draft.into_site(new_document_id(), stamp.created_at, stamp.created_by);
        self.insert_document(SITES_COLLECTION, &site.id, site.created_at, &site)?;
        Ok(site)
    }

    async fn get_site(&self, id: &str) -> StoreResult<Option<Site>> {
        self.get_document(SITES_COLLECTION, id)
    }

    async fn list_sites(&self) -> StoreResult<Vec<Site>> {
        self.list_documents(SITES_COLLECTION)
    }

    async fn insert_artifact(
        &self,
        draft: ArtifactDraft,
        stamp: CreationStamp,
    ) -> StoreResult<Artifact> {
        let artifact = draft.into_artifact(new_document_id(), stamp.created_at);
        self.insert_document(
            ARTIFACTS_COLLECTION,
            &artifact.id,
            artifact.created_at,
            &artifact,
        )?;
        Ok(artifact)
    }

    async fn append_site_artifact(&self, site_id: &str, artifact_id: &str) -> StoreResult<()> {
        self.append_artifact_ref(site_id, artifact_id)
    }

    async fn list_artifacts(&self, site_id: &str) -> StoreResult<Vec<Artifact>> {
        // Decode every row first so a malformed body is reported even when it
        // belongs to another site.
        let artifacts: Vec<Artifact> = self.list_documents(ARTIFACTS_COLLECTION)?;
        Ok(artifacts
            .into_iter()
            .filter(|artifact| artifact.site_id == site_id)
            .collect())
    }
}

impl ArchaeologistRegistry for SqliteRecordStore {
    async fn find_archaeologist(
        &self,
        identity_id: &IdentityId,
    ) -> StoreResult<Option<ArchaeologistProfile>> {
        self.get_document(ARCHAEOLOGISTS_COLLECTION, identity_id.as_str())
    }

    async fn register_archaeologist(&self, profile: &ArchaeologistProfile) -> StoreResult<()> {
        self.upsert_document(
            ARCHAEOLOGISTS_COLLECTION,
            profile.identity_id.as_str(),
            profile,
        )
    }
}

fn decode_document<T: DeserializeOwned>(
    collection: &'static str,
    id: &str,
    body: &str,
) -> StoreResult<T> {
    serde_json::from_str(body).map_err(|err| {
        StoreError::InvalidData(format!("{collection}/{id} cannot be decoded: {err}"))
    })
}
