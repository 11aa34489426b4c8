//! Authentication state store.
//!
//! DESIGN
//! ======
//! Single source of truth for "who is signed in, and has the initial
//! determination completed". A spawned task applies every provider
//! notification; the readiness latch trips on the first one and never
//! resets, so `wait_for_ready` suspends exactly the navigations that start
//! before the first determination and nothing after it.
//!
//! The identity snapshot lives behind one lock and `is_logged_in` is derived
//! from it on read, so the two can never disagree.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::watch;

use super::identity::{Identity, IdentityProvider, ProviderError, SessionState};
use crate::latch::Latch;

pub struct AuthStore {
    provider: Arc<dyn IdentityProvider>,
    identity: RwLock<Option<Identity>>,
    ready: Latch,
}

impl AuthStore {
    /// Build the store and start tracking the provider's session state.
    #[must_use]
    pub fn start(provider: Arc<dyn IdentityProvider>) -> Arc<Self> {
        let rx = provider.subscribe();
        let store = Arc::new(Self {
            provider,
            identity: RwLock::new(None),
            ready: Latch::new(),
        });
        tokio::spawn(Self::track(store.clone(), rx));
        store
    }

    /// Apply provider notifications until the provider goes away.
    async fn track(store: Arc<Self>, mut rx: watch::Receiver<SessionState>) {
        loop {
            let state = rx.borrow_and_update().clone();
            store.apply(&state);
            if rx.changed().await.is_err() {
                // Provider dropped; the last observed state stands.
                break;
            }
        }
    }

    fn apply(&self, state: &SessionState) {
        if state.is_restoring() {
            // The first determination has not arrived yet.
            return;
        }
        self.set_identity(state.identity().cloned());
        self.ready.trip();
    }

    fn set_identity(&self, identity: Option<Identity>) {
        *self
            .identity
            .write()
            .unwrap_or_else(PoisonError::into_inner) = identity;
    }

    /// Current identity, if signed in.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.identity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.identity
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Whether the first auth determination has completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.ready.is_tripped()
    }

    /// Resolves once the first auth determination has landed. Resolves
    /// immediately for callers arriving after that point; never errors.
    pub async fn wait_for_ready(&self) {
        self.ready.wait().await;
    }

    /// Sign out via the provider.
    ///
    /// On success the local state is cleared optimistically; the provider's
    /// own notification confirms the signed-out state idempotently. On
    /// failure local state is left untouched, the error is logged and
    /// returned, and readiness is unaffected either way.
    ///
    /// # Errors
    ///
    /// Returns the provider's sign-out error.
    pub async fn logout(&self) -> Result<(), ProviderError> {
        if let Err(e) = self.provider.sign_out().await {
            tracing::error!(error = %e, "logout failed");
            return Err(e);
        }
        self.set_identity(None);
        tracing::info!("user logged out");
        Ok(())
    }
}

#[cfg(test)]
#[path = "auth_store_test.rs"]
mod tests;
