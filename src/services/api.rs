//! Community API client.
//!
//! ARCHITECTURE
//! ============
//! All durable data (events, profiles) lives behind the hosted community
//! API; this crate owns no persistence. `CommunityApi` is the seam the pages
//! talk through: the REST implementation maps HTTP failures onto `ApiError`,
//! and tests swap in the in-memory mock from `state::test_helpers`.

use uuid::Uuid;

use super::events::{Event, EventDraft};
use super::profile::Profile;
use crate::config::AppConfig;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid event: {0}")]
    InvalidDraft(&'static str),
    #[error("not found")]
    NotFound,
    #[error("not authorized")]
    Unauthorized,
    #[error("community api error: {0}")]
    Api(String),
    #[error("community api unavailable: {0}")]
    Transport(String),
}

#[async_trait::async_trait]
pub trait CommunityApi: Send + Sync {
    async fn list_events(&self) -> Result<Vec<Event>, ApiError>;

    async fn get_event(&self, id: Uuid) -> Result<Event, ApiError>;

    /// Post a new event. The server derives the host from the bearer token.
    async fn create_event(&self, draft: &EventDraft, id_token: &str) -> Result<Event, ApiError>;

    /// Fetch a profile; `None` means the user has not saved one yet.
    async fn get_profile(&self, uid: &str, id_token: &str) -> Result<Option<Profile>, ApiError>;

    async fn update_profile(&self, profile: &Profile, id_token: &str) -> Result<(), ApiError>;
}

// =============================================================================
// REST CLIENT
// =============================================================================

pub struct RestCommunityApi {
    http: reqwest::Client,
    base: String,
}

impl RestCommunityApi {
    #[must_use]
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: config.api_base.trim_end_matches('/').to_owned(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }
}

#[async_trait::async_trait]
impl CommunityApi for RestCommunityApi {
    async fn list_events(&self) -> Result<Vec<Event>, ApiError> {
        let resp = self
            .http
            .get(self.url("/v1/events"))
            .send()
            .await
            .map_err(transport)?;
        if !resp.status().is_success() {
            return Err(into_api_error(resp).await);
        }
        resp.json().await.map_err(transport)
    }

    async fn get_event(&self, id: Uuid) -> Result<Event, ApiError> {
        let resp = self
            .http
            .get(self.url(&format!("/v1/events/{id}")))
            .send()
            .await
            .map_err(transport)?;
        if !resp.status().is_success() {
            return Err(into_api_error(resp).await);
        }
        resp.json().await.map_err(transport)
    }

    async fn create_event(&self, draft: &EventDraft, id_token: &str) -> Result<Event, ApiError> {
        draft.validate()?;
        let resp = self
            .http
            .post(self.url("/v1/events"))
            .bearer_auth(id_token)
            .json(draft)
            .send()
            .await
            .map_err(transport)?;
        if !resp.status().is_success() {
            return Err(into_api_error(resp).await);
        }
        resp.json().await.map_err(transport)
    }

    async fn get_profile(&self, uid: &str, id_token: &str) -> Result<Option<Profile>, ApiError> {
        let resp = self
            .http
            .get(self.url(&format!("/v1/profiles/{uid}")))
            .bearer_auth(id_token)
            .send()
            .await
            .map_err(transport)?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(into_api_error(resp).await);
        }
        resp.json().await.map_err(transport)
    }

    async fn update_profile(&self, profile: &Profile, id_token: &str) -> Result<(), ApiError> {
        let resp = self
            .http
            .put(self.url(&format!("/v1/profiles/{}", profile.uid)))
            .bearer_auth(id_token)
            .json(profile)
            .send()
            .await
            .map_err(transport)?;
        if !resp.status().is_success() {
            return Err(into_api_error(resp).await);
        }
        Ok(())
    }
}

fn transport(e: reqwest::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

async fn into_api_error(resp: reqwest::Response) -> ApiError {
    let status = resp.status();
    match status {
        reqwest::StatusCode::NOT_FOUND => ApiError::NotFound,
        reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => ApiError::Unauthorized,
        _ => {
            let body = resp.text().await.unwrap_or_default();
            ApiError::Api(format!("{status}: {body}"))
        }
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
