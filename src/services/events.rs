//! Community event types and draft validation.

use time::OffsetDateTime;
use uuid::Uuid;

use super::api::ApiError;

/// A community event as served by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub location: String,
    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,
    /// Uid of the user who posted the event.
    pub host_uid: String,
    #[serde(default)]
    pub host_name: Option<String>,
}

/// Fields a user supplies when posting a new event. The server assigns the
/// id and derives the host from the bearer token.
#[derive(Debug, Clone, serde::Serialize)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,
}

impl EventDraft {
    /// Validate user-supplied fields before hitting the API.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidDraft` naming the offending field.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::InvalidDraft("title must not be empty"));
        }
        if self.location.trim().is_empty() {
            return Err(ApiError::InvalidDraft("location must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "events_test.rs"]
mod tests;
