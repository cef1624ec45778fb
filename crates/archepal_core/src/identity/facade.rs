//! Identity facade over an external provider.
//!
//! # Responsibility
//! - Hold the last known session identity and expose it synchronously.
//! - Fan identity transitions out to registered listeners and `watch`
//!   receivers.
//!
//! # Invariants
//! - Provider errors collapse to `None` and are logged, never propagated from
//!   `current_identity`/`refresh`.
//! - A session update with the same id and email is not a transition.
//! - Listeners run outside the listener-table lock.

use crate::identity::provider::{IdentityError, IdentityProvider, OAuthProvider};
use crate::model::identity::Identity;
use log::{info, warn};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Handle returned by [`IdentityFacade::on_identity_change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

type Listener = Arc<dyn Fn(Option<&Identity>) + Send + Sync>;

/// Current-identity view of an external identity provider.
pub struct IdentityFacade<P> {
    provider: P,
    session: watch::Sender<Option<Identity>>,
    listeners: Mutex<BTreeMap<ListenerId, Listener>>,
    next_listener_id: AtomicU64,
}

impl<P: IdentityProvider> IdentityFacade<P> {
    /// Creates a facade seeded from the provider's current session.
    pub fn new(provider: P) -> Self {
        let initial = collapse(provider.current_identity());
        let (session, _) = watch::channel(initial);
        Self {
            provider,
            session,
            listeners: Mutex::new(BTreeMap::new()),
            next_listener_id: AtomicU64::new(1),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Returns the current identity, or `None` when signed out or when the
    /// provider faulted.
    pub fn current_identity(&self) -> Option<Identity> {
        self.session.borrow().clone()
    }

    /// Re-reads the provider session and publishes any transition.
    pub fn refresh(&self) -> Option<Identity> {
        let identity = collapse(self.provider.current_identity());
        self.apply_session(identity.clone());
        identity
    }

    /// Publishes a session change pushed by the provider.
    ///
    /// Returns `true` when the identity changed and subscribers were notified.
    pub fn apply_session(&self, identity: Option<Identity>) -> bool {
        let changed = self.session.send_if_modified(|current| {
            if *current == identity {
                return false;
            }
            *current = identity.clone();
            true
        });
        if !changed {
            return false;
        }

        info!(
            "event=identity_change module=identity status=ok signed_in={}",
            identity.is_some()
        );
        let listeners = self.listeners.lock().values().cloned().collect::<Vec<_>>();
        for listener in listeners {
            listener(identity.as_ref());
        }
        true
    }

    /// Registers a callback invoked on every identity transition.
    pub fn on_identity_change(
        &self,
        listener: impl Fn(Option<&Identity>) + Send + Sync + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().insert(id, Arc::new(listener));
        id
    }

    /// Removes a listener. Returns `false` when the id was unknown.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.lock().remove(&id).is_some()
    }

    /// Returns a receiver that observes identity transitions.
    pub fn watch(&self) -> watch::Receiver<Option<Identity>> {
        self.session.subscribe()
    }

    pub async fn sign_in_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, IdentityError> {
        let outcome = self.provider.sign_in_with_email(email, password).await;
        self.finish_sign_in("email_sign_in", outcome)
    }

    pub async fn sign_up_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Identity, IdentityError> {
        let outcome = self.provider.sign_up_with_email(email, password).await;
        self.finish_sign_in("email_sign_up", outcome)
    }

    pub async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
    ) -> Result<Identity, IdentityError> {
        let outcome = self.provider.sign_in_with_oauth(provider).await;
        self.finish_sign_in("oauth_sign_in", outcome)
    }

    /// Signs out through the provider; the session clears only on success.
    pub async fn sign_out(&self) -> Result<(), IdentityError> {
        match self.provider.sign_out().await {
            Ok(()) => {
                self.apply_session(None);
                Ok(())
            }
            Err(err) => {
                warn!("event=sign_out module=identity status=error error={err}");
                Err(err)
            }
        }
    }

    fn finish_sign_in(
        &self,
        event: &'static str,
        outcome: Result<Identity, IdentityError>,
    ) -> Result<Identity, IdentityError> {
        match outcome {
            Ok(identity) => {
                info!("event={event} module=identity status=ok");
                self.apply_session(Some(identity.clone()));
                Ok(identity)
            }
            Err(err) => {
                warn!("event={event} module=identity status=error error={err}");
                Err(err)
            }
        }
    }
}

fn collapse(result: Result<Option<Identity>, IdentityError>) -> Option<Identity> {
    match result {
        Ok(identity) => identity,
        Err(err) => {
            warn!("event=identity_read module=identity status=error fallback=signed_out error={err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IdentityFacade;
    use crate::identity::provider::{IdentityError, IdentityProvider, OAuthProvider};
    use crate::model::identity::Identity;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct ScriptedProvider {
        session: Mutex<Result<Option<Identity>, IdentityError>>,
    }

    impl ScriptedProvider {
        fn with(session: Result<Option<Identity>, IdentityError>) -> Self {
            Self {
                session: Mutex::new(session),
            }
        }
    }

    impl Default for ScriptedProvider {
        fn default() -> Self {
            Self::with(Ok(None))
        }
    }

    impl IdentityProvider for ScriptedProvider {
        fn current_identity(&self) -> Result<Option<Identity>, IdentityError> {
            self.session.lock().clone()
        }

        async fn sign_in_with_email(
            &self,
            email: &str,
            password: &str,
        ) -> Result<Identity, IdentityError> {
            if password != "secret" {
                return Err(IdentityError::Rejected("wrong password".to_string()));
            }
            let identity = Identity::new(format!("uid-{email}"), email);
            *self.session.lock() = Ok(Some(identity.clone()));
            Ok(identity)
        }

        async fn sign_up_with_email(
            &self,
            email: &str,
            password: &str,
        ) -> Result<Identity, IdentityError> {
            self.sign_in_with_email(email, password).await
        }

        async fn sign_in_with_oauth(
            &self,
            provider: OAuthProvider,
        ) -> Result<Identity, IdentityError> {
            Ok(Identity::new(provider.as_str(), "oauth@example.com"))
        }

        async fn sign_out(&self) -> Result<(), IdentityError> {
            *self.session.lock() = Ok(None);
            Ok(())
        }
    }

    #[test]
    fn provider_fault_reads_as_signed_out() {
        let facade = IdentityFacade::new(ScriptedProvider::with(Err(
            IdentityError::Unavailable("offline".to_string()),
        )));
        assert_eq!(facade.current_identity(), None);
        assert_eq!(facade.refresh(), None);
    }

    #[test]
    fn listeners_fire_only_on_transitions() {
        let facade = IdentityFacade::new(ScriptedProvider::with(Ok(None)));
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let id = facade.on_identity_change(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let alice = Identity::new("u1", "alice@example.com");
        assert!(facade.apply_session(Some(alice.clone())));
        assert!(!facade.apply_session(Some(alice)));
        assert!(facade.apply_session(None));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        assert!(facade.remove_listener(id));
        assert!(facade.apply_session(Some(Identity::new("u2", "bob@example.com"))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn sign_in_publishes_and_failed_sign_in_keeps_session() {
        let facade = IdentityFacade::new(ScriptedProvider::default());
        let mut session = facade.watch();

        let err = facade
            .sign_in_with_email("a@example.com", "nope")
            .await
            .expect_err("bad password must fail");
        assert!(matches!(err, IdentityError::Rejected(_)));
        assert_eq!(facade.current_identity(), None);
        assert!(!session.has_changed().expect("sender alive"));

        facade
            .sign_in_with_email("a@example.com", "secret")
            .await
            .expect("sign in");
        assert!(session.has_changed().expect("sender alive"));
        let current = session.borrow_and_update().clone().expect("signed in");
        assert_eq!(current.email, "a@example.com");

        facade.sign_out().await.expect("sign out");
        assert_eq!(facade.current_identity(), None);
    }
}
