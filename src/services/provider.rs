//! REST identity provider.
//!
//! ARCHITECTURE
//! ============
//! Wraps the hosted identity API behind the `IdentityProvider` trait.
//! Session persistence is a single JSON file holding the refresh token,
//! the terminal analogue of the browser's local storage. Startup spawns one
//! restore task that always publishes a first `SessionState`, so auth
//! readiness completes even when restoration fails.
//!
//! TRADE-OFFS
//! ==========
//! Sign-out is local token destruction (as in the upstream SDK): the refresh
//! token is deleted and `SignedOut` published. The id token stays valid until
//! it expires server-side; revocation is the provider's concern, not ours.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::watch;

use super::identity::{Identity, IdentityProvider, ProviderError, SessionState};
use crate::config::AppConfig;

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize, serde::Deserialize)]
struct StoredSession {
    refresh_token: String,
}

/// Response of `accounts:signUp` and `accounts:signInWithPassword`.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialResponse {
    local_id: String,
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    id_token: String,
    refresh_token: String,
}

/// Response of the token refresh endpoint (snake_case on the wire).
#[derive(Debug, serde::Deserialize)]
struct RefreshResponse {
    user_id: String,
    id_token: String,
    refresh_token: String,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    email: String,
    #[serde(default)]
    display_name: Option<String>,
}

// =============================================================================
// PROVIDER
// =============================================================================

pub struct RestIdentityProvider {
    http: reqwest::Client,
    api_key: String,
    identity_base: String,
    token_base: String,
    session_file: PathBuf,
    session_tx: watch::Sender<SessionState>,
}

impl RestIdentityProvider {
    /// Build the provider and spawn the one-shot session restore. The restore
    /// task publishes the first `SessionState` on every path, including
    /// failures, so `Restoring` never sticks.
    #[must_use]
    pub fn start(config: &AppConfig) -> Arc<Self> {
        let (session_tx, _rx) = watch::channel(SessionState::Restoring);
        let provider = Arc::new(Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            identity_base: config.identity_base.trim_end_matches('/').to_owned(),
            token_base: config.token_base.trim_end_matches('/').to_owned(),
            session_file: config.session_file.clone(),
            session_tx,
        });

        tokio::spawn({
            let provider = provider.clone();
            async move { provider.restore().await }
        });
        provider
    }

    async fn restore(&self) {
        match self.try_restore().await {
            Ok(Some(identity)) => {
                tracing::info!(uid = %identity.uid, "session restored");
                self.session_tx.send_replace(SessionState::SignedIn(identity));
            }
            Ok(None) => {
                tracing::info!("no stored session, starting signed out");
                self.session_tx.send_replace(SessionState::SignedOut);
            }
            Err(e) => {
                tracing::warn!(error = %e, "session restore failed, starting signed out");
                self.session_tx.send_replace(SessionState::SignedOut);
            }
        }
    }

    async fn try_restore(&self) -> Result<Option<Identity>, ProviderError> {
        let raw = match tokio::fs::read_to_string(&self.session_file).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ProviderError::SessionStorage(e.to_string())),
        };
        let stored: StoredSession =
            serde_json::from_str(&raw).map_err(|e| ProviderError::SessionStorage(e.to_string()))?;
        let identity = self.refresh(&stored.refresh_token).await?;
        Ok(Some(identity))
    }

    /// Exchange a refresh token for fresh credentials, then look up the
    /// account so the identity carries email and display name.
    async fn refresh(&self, refresh_token: &str) -> Result<Identity, ProviderError> {
        let url = format!("{}/v1/token?key={}", self.token_base, self.api_key);
        let resp = self
            .http
            .post(&url)
            .form(&[("grant_type", "refresh_token"), ("refresh_token", refresh_token)])
            .send()
            .await
            .map_err(transport)?;
        let resp = check_status(resp).await?;
        let token: RefreshResponse = resp.json().await.map_err(transport)?;

        let account = self.lookup(&token.id_token).await?;
        Ok(Identity {
            uid: token.user_id,
            email: account.email,
            display_name: account.display_name,
            id_token: token.id_token,
            refresh_token: token.refresh_token,
        })
    }

    async fn lookup(&self, id_token: &str) -> Result<LookupUser, ProviderError> {
        let url = format!("{}/v1/accounts:lookup?key={}", self.identity_base, self.api_key);
        let resp = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "idToken": id_token }))
            .send()
            .await
            .map_err(transport)?;
        let resp = check_status(resp).await?;
        let lookup: LookupResponse = resp.json().await.map_err(transport)?;
        lookup
            .users
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Rejected("account lookup returned no user".into()))
    }

    async fn send_credentials(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<Identity, ProviderError> {
        let resp = self.http.post(url).json(body).send().await.map_err(transport)?;
        let resp = check_status(resp).await?;
        let cred: CredentialResponse = resp.json().await.map_err(transport)?;
        Ok(Identity {
            uid: cred.local_id,
            email: cred.email,
            display_name: cred.display_name,
            id_token: cred.id_token,
            refresh_token: cred.refresh_token,
        })
    }

    /// Persist the refresh token and publish the new session. Persistence is
    /// best effort: a failure costs session restore on the next run, not the
    /// current sign-in.
    async fn complete_sign_in(&self, identity: Identity) -> Identity {
        self.persist(&identity).await;
        self.session_tx
            .send_replace(SessionState::SignedIn(identity.clone()));
        identity
    }

    async fn persist(&self, identity: &Identity) {
        let stored = StoredSession { refresh_token: identity.refresh_token.clone() };
        let raw = match serde_json::to_string(&stored) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "failed to encode session file");
                return;
            }
        };
        if let Err(e) = tokio::fs::write(&self.session_file, raw).await {
            tracing::warn!(error = %e, path = %self.session_file.display(), "failed to persist session");
        }
    }
}

#[async_trait::async_trait]
impl IdentityProvider for RestIdentityProvider {
    fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.session_tx.subscribe()
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> Result<Identity, ProviderError> {
        let url = format!("{}/v1/accounts:signUp?key={}", self.identity_base, self.api_key);
        let mut body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        if let Some(name) = display_name {
            body["displayName"] = name.into();
        }
        let identity = self.send_credentials(&url, &body).await?;
        Ok(self.complete_sign_in(identity).await)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, ProviderError> {
        let url = format!(
            "{}/v1/accounts:signInWithPassword?key={}",
            self.identity_base, self.api_key
        );
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        let identity = self.send_credentials(&url, &body).await?;
        Ok(self.complete_sign_in(identity).await)
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        match tokio::fs::remove_file(&self.session_file).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(ProviderError::SessionStorage(e.to_string())),
        }
        self.session_tx.send_replace(SessionState::SignedOut);
        Ok(())
    }
}

// =============================================================================
// HTTP HELPERS
// =============================================================================

fn transport(e: reqwest::Error) -> ProviderError {
    ProviderError::Transport(e.to_string())
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(ProviderError::Rejected(
        api_error_message(&body).unwrap_or_else(|| format!("{status}: {body}")),
    ))
}

/// Extract the error code from the identity API's error envelope
/// (`{"error": {"message": "EMAIL_NOT_FOUND"}}`).
fn api_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value["error"]["message"].as_str().map(str::to_owned)
}

#[cfg(test)]
#[path = "provider_test.rs"]
mod tests;
