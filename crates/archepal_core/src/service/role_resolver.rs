//! Archaeologist role resolution.
//!
//! # Responsibility
//! - Decide whether an identity may mutate catalog records by looking it up
//!   in the archaeologist registry.
//! - Expose `{is_archaeologist, loading, error}` for the identity most
//!   recently submitted.
//!
//! # Invariants
//! - No identity resolves immediately to "not an archaeologist" with no
//!   registry call.
//! - Fail closed: a lookup error never yields `is_archaeologist = true`.
//! - Only the newest resolution may publish its result; stale completions are
//!   dropped.
//! - No retries. Identity transitions are the only resubmission trigger.
//! - While tracking, a transition is acted on even when an earlier lookup has
//!   not settled.

use crate::model::identity::{Identity, IdentityId};
use crate::repo::record_store::ArchaeologistRegistry;
use log::{debug, warn};
use parking_lot::Mutex;
use tokio::sync::watch;

/// Role state for one identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchaeologistStatus {
    /// Identity this status was computed for; `None` when signed out.
    pub identity_id: Option<IdentityId>,
    pub is_archaeologist: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl ArchaeologistStatus {
    /// Status for "no identity": settled, not an archaeologist, no error.
    pub fn signed_out() -> Self {
        Self::default()
    }

    fn pending(identity_id: IdentityId) -> Self {
        Self {
            identity_id: Some(identity_id),
            loading: true,
            ..Self::default()
        }
    }

    fn settled(identity_id: IdentityId, is_archaeologist: bool) -> Self {
        Self {
            identity_id: Some(identity_id),
            is_archaeologist,
            ..Self::default()
        }
    }

    fn failed(identity_id: IdentityId, error: String) -> Self {
        Self {
            identity_id: Some(identity_id),
            error: Some(error),
            ..Self::default()
        }
    }

    /// Whether this status was computed for `identity`.
    pub fn is_for(&self, identity: &Identity) -> bool {
        self.identity_id.as_ref() == Some(&identity.id)
    }
}

struct ResolverState {
    status: ArchaeologistStatus,
    latest_request: u64,
}

/// Resolves archaeologist status through a registry lookup.
pub struct RoleResolver<R> {
    registry: R,
    state: Mutex<ResolverState>,
}

impl<R: ArchaeologistRegistry> RoleResolver<R> {
    pub fn new(registry: R) -> Self {
        Self {
            registry,
            state: Mutex::new(ResolverState {
                status: ArchaeologistStatus::signed_out(),
                latest_request: 0,
            }),
        }
    }

    /// Returns the current status snapshot.
    pub fn status(&self) -> ArchaeologistStatus {
        self.state.lock().status.clone()
    }

    /// Resolves the status for `identity` and returns the published status.
    ///
    /// `loading` stays `true` in [`status`](Self::status) until the lookup
    /// settles. When a newer resolution starts meanwhile, this result is
    /// discarded and the newer state is returned instead.
    pub async fn resolve(&self, identity: Option<&Identity>) -> ArchaeologistStatus {
        let Some(identity) = identity else {
            let mut state = self.state.lock();
            state.latest_request += 1;
            state.status = ArchaeologistStatus::signed_out();
            return state.status.clone();
        };

        let request = {
            let mut state = self.state.lock();
            state.latest_request += 1;
            state.status = ArchaeologistStatus::pending(identity.id.clone());
            state.latest_request
        };

        let outcome = match self.registry.find_archaeologist(&identity.id).await {
            Ok(profile) => ArchaeologistStatus::settled(identity.id.clone(), profile.is_some()),
            Err(err) => {
                warn!("event=role_resolve module=service status=error fail_closed=true error={err}");
                ArchaeologistStatus::failed(identity.id.clone(), err.to_string())
            }
        };

        let mut state = self.state.lock();
        if state.latest_request == request {
            debug!(
                "event=role_resolve module=service status=ok is_archaeologist={}",
                outcome.is_archaeologist
            );
            state.status = outcome;
        } else {
            debug!("event=role_resolve module=service status=stale request={request}");
        }
        state.status.clone()
    }

    /// Re-resolves on every identity transition until the sender is dropped.
    ///
    /// A transition observed while a lookup is still pending abandons that
    /// lookup and resolves the new identity right away.
    pub async fn track(&self, mut session: watch::Receiver<Option<Identity>>) {
        loop {
            let identity = session.borrow_and_update().clone();
            let next = tokio::select! {
                _ = self.resolve(identity.as_ref()) => session.changed().await,
                changed = session.changed() => {
                    debug!("event=role_resolve module=service status=superseded");
                    changed
                }
            };
            if next.is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ArchaeologistStatus, RoleResolver};
    use crate::model::identity::{ArchaeologistProfile, Identity, IdentityId};
    use crate::repo::record_store::{ArchaeologistRegistry, StoreError, StoreResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::watch;

    #[derive(Default)]
    struct FixedRegistry {
        members: Vec<&'static str>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl ArchaeologistRegistry for FixedRegistry {
        async fn find_archaeologist(
            &self,
            identity_id: &IdentityId,
        ) -> StoreResult<Option<ArchaeologistProfile>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(StoreError::Unavailable("registry offline".to_string()));
            }
            Ok(self
                .members
                .iter()
                .any(|member| *member == identity_id.as_str())
                .then(|| ArchaeologistProfile {
                    identity_id: identity_id.clone(),
                    email: String::new(),
                    display_name: None,
                }))
        }

        async fn register_archaeologist(&self, _profile: &ArchaeologistProfile) -> StoreResult<()> {
            Ok(())
        }
    }

    /// Registry whose lookups never complete.
    struct StalledRegistry;

    impl ArchaeologistRegistry for StalledRegistry {
        async fn find_archaeologist(
            &self,
            _identity_id: &IdentityId,
        ) -> StoreResult<Option<ArchaeologistProfile>> {
            std::future::pending().await
        }

        async fn register_archaeologist(&self, _profile: &ArchaeologistProfile) -> StoreResult<()> {
            Ok(())
        }
    }

    async fn yield_a_while() {
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn no_identity_resolves_without_lookup() {
        let resolver = RoleResolver::new(FixedRegistry::default());
        let status = resolver.resolve(None).await;
        assert_eq!(status, ArchaeologistStatus::signed_out());
        assert!(!status.loading);
        assert_eq!(status.error, None);
        assert_eq!(resolver.registry.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn registry_membership_decides_role() {
        let resolver = RoleResolver::new(FixedRegistry {
            members: vec!["u1"],
            ..FixedRegistry::default()
        });

        let member = resolver.resolve(Some(&Identity::new("u1", "a@x.org"))).await;
        assert!(member.is_archaeologist);
        assert!(!member.loading);

        let stranger = resolver.resolve(Some(&Identity::new("u2", "b@x.org"))).await;
        assert!(!stranger.is_archaeologist);
        assert_eq!(stranger.identity_id.as_ref().map(|id| id.as_str()), Some("u2"));
    }

    #[tokio::test]
    async fn lookup_failure_fails_closed() {
        let resolver = RoleResolver::new(FixedRegistry {
            members: vec!["u1"],
            fail: true,
            ..FixedRegistry::default()
        });
        let status = resolver.resolve(Some(&Identity::new("u1", "a@x.org"))).await;
        assert!(!status.is_archaeologist);
        assert!(!status.loading);
        assert!(status.error.expect("error recorded").contains("registry offline"));
    }

    #[tokio::test]
    async fn tracked_sign_out_overrides_stalled_lookup() {
        let resolver = Arc::new(RoleResolver::new(StalledRegistry));
        let (session, receiver) = watch::channel(Some(Identity::new("u1", "a@x.org")));
        let tracker = {
            let resolver = Arc::clone(&resolver);
            tokio::spawn(async move { resolver.track(receiver).await })
        };

        yield_a_while().await;
        assert!(resolver.status().loading);

        session.send(None).expect("tracker alive");
        yield_a_while().await;
        assert_eq!(resolver.status(), ArchaeologistStatus::signed_out());

        drop(session);
        tracker.await.expect("tracker exits");
    }
}
