//! In-memory record list cache with request tokens.
//!
//! # Responsibility
//! - Hold `{data, loading, error}` for one list view.
//! - Apply fetch results only when they belong to the newest fetch.
//!
//! # Invariants
//! - Every [`RecordCache::begin`] issues a token greater than all earlier ones.
//! - A completion whose token is not the latest is dropped and leaves state
//!   untouched.
//! - A failed fetch clears `data`; a successful one clears `error`.
//! - No timer refresh. A new activation is the only refetch trigger.

use crate::model::artifact::Artifact;
use crate::model::site::Site;
use crate::repo::record_store::RecordStore;
use crate::service::mutation_gate::CreateAuthorizer;
use crate::service::record_client::RecordStoreClient;
use log::debug;
use parking_lot::Mutex;
use std::fmt::Display;
use std::future::Future;

/// Presentation-facing view of a cached list.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheState<T> {
    pub data: Vec<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for CacheState<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

/// Identifies one fetch issued through [`RecordCache::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchToken(u64);

struct CacheInner<T> {
    state: CacheState<T>,
    latest: u64,
}

/// Cache-once list holder for one consuming view.
pub struct RecordCache<T> {
    inner: Mutex<CacheInner<T>>,
}

pub type SiteListCache = RecordCache<Site>;
pub type ArtifactListCache = RecordCache<Artifact>;

impl<T> Default for RecordCache<T> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                state: CacheState::default(),
                latest: 0,
            }),
        }
    }
}

impl<T: Clone> RecordCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> CacheState<T> {
        self.inner.lock().state.clone()
    }

    /// Marks a fetch as in flight and returns its token.
    ///
    /// Data from the previous fetch stays visible while loading.
    pub fn begin(&self) -> FetchToken {
        let mut inner = self.inner.lock();
        inner.latest += 1;
        inner.state.loading = true;
        inner.state.error = None;
        FetchToken(inner.latest)
    }

    /// Applies a fetch result. Returns `false` when `token` is stale.
    pub fn complete<E: Display>(&self, token: FetchToken, result: Result<Vec<T>, E>) -> bool {
        let mut inner = self.inner.lock();
        if token.0 != inner.latest {
            debug!(
                "event=cache_complete module=service status=stale token={} latest={}",
                token.0, inner.latest
            );
            return false;
        }

        inner.state.loading = false;
        match result {
            Ok(data) => {
                inner.state.data = data;
                inner.state.error = None;
            }
            Err(err) => {
                inner.state.data.clear();
                inner.state.error = Some(err.to_string());
            }
        }
        true
    }

    /// Runs one fetch through `begin`/`complete`.
    pub async fn activate<F, Fut, E>(&self, fetch: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
        E: Display,
    {
        let token = self.begin();
        let result = fetch().await;
        self.complete(token, result)
    }
}

impl RecordCache<Site> {
    /// Fetches the full site list once.
    pub async fn load_sites<S, A>(&self, client: &RecordStoreClient<S, A>) -> bool
    where
        S: RecordStore,
        A: CreateAuthorizer,
    {
        self.activate(|| client.list_sites()).await
    }
}

impl RecordCache<Artifact> {
    /// Fetches the artifacts owned by `site_id` once.
    pub async fn load_artifacts<S, A>(&self, client: &RecordStoreClient<S, A>, site_id: &str) -> bool
    where
        S: RecordStore,
        A: CreateAuthorizer,
    {
        self.activate(|| client.list_artifacts(site_id)).await
    }
}
