use time::macros::datetime;
use uuid::Uuid;

use super::*;

fn draft() -> EventDraft {
    EventDraft {
        title: "Summer block party".into(),
        description: "Food, music, neighbors.".into(),
        location: "Maple Street park".into(),
        starts_at: datetime!(2026-09-01 18:00 UTC),
    }
}

// =============================================================================
// EventDraft::validate
// =============================================================================

#[test]
fn valid_draft_passes() {
    assert!(draft().validate().is_ok());
}

#[test]
fn empty_title_rejected() {
    let mut d = draft();
    d.title = String::new();
    assert!(matches!(d.validate(), Err(ApiError::InvalidDraft("title must not be empty"))));
}

#[test]
fn whitespace_title_rejected() {
    let mut d = draft();
    d.title = "   ".into();
    assert!(d.validate().is_err());
}

#[test]
fn empty_location_rejected() {
    let mut d = draft();
    d.location = String::new();
    assert!(matches!(
        d.validate(),
        Err(ApiError::InvalidDraft("location must not be empty"))
    ));
}

#[test]
fn empty_description_is_allowed() {
    let mut d = draft();
    d.description = String::new();
    assert!(d.validate().is_ok());
}

// =============================================================================
// Event serde
// =============================================================================

#[test]
fn event_deserializes_with_rfc3339_timestamp() {
    let id = Uuid::new_v4();
    let json = format!(
        r#"{{
            "id": "{id}",
            "title": "Cleanup day",
            "location": "Riverside",
            "starts_at": "2026-09-01T18:00:00Z",
            "host_uid": "u1",
            "host_name": "Alice"
        }}"#
    );
    let event: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(event.id, id);
    assert_eq!(event.starts_at, datetime!(2026-09-01 18:00 UTC));
    assert_eq!(event.description, "");
    assert_eq!(event.host_name.as_deref(), Some("Alice"));
}

#[test]
fn draft_serializes_rfc3339_timestamp() {
    let json = serde_json::to_value(draft()).unwrap();
    assert_eq!(json["starts_at"], "2026-09-01T18:00:00Z");
}
