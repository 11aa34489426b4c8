//! Identity provider contract.
//!
//! DESIGN
//! ======
//! The provider owns all authentication protocol details; this crate only
//! observes the resulting session state. `subscribe` hands out a watch
//! receiver that starts at `Restoring` and is guaranteed exactly one
//! transition out of it at startup (a restored session or a confirmed
//! absence), then one update per sign-in/sign-out.

use tokio::sync::watch;

/// The signed-in user as reported by the identity provider. Opaque to the
/// navigation core beyond presence or absence.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    /// Short-lived bearer token for the community API.
    pub id_token: String,
    /// Long-lived token used to restore the session on the next run.
    pub refresh_token: String,
}

/// Session state as published by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Startup restoration has not completed yet.
    Restoring,
    SignedIn(Identity),
    SignedOut,
}

impl SessionState {
    /// The identity carried by this state, if signed in.
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SessionState::SignedIn(identity) => Some(identity),
            SessionState::Restoring | SessionState::SignedOut => None,
        }
    }

    /// Whether the initial determination is still pending.
    #[must_use]
    pub fn is_restoring(&self) -> bool {
        matches!(self, SessionState::Restoring)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("identity api rejected the request: {0}")]
    Rejected(String),
    #[error("identity api unavailable: {0}")]
    Transport(String),
    #[error("session storage error: {0}")]
    SessionStorage(String),
}

/// External identity provider.
///
/// Injected everywhere as `Arc<dyn IdentityProvider>` so tests can substitute
/// a scripted double.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Subscribe to session-state changes. The receiver's current value is
    /// always valid; `Restoring` means the first determination is pending.
    fn subscribe(&self) -> watch::Receiver<SessionState>;

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Identity, ProviderError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, ProviderError>;

    async fn sign_out(&self) -> Result<(), ProviderError>;
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
