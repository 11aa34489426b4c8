use std::sync::atomic::Ordering;
use std::time::Duration;

use super::*;
use crate::state::test_helpers::{MockProvider, settle, test_identity};

// =============================================================================
// readiness
// =============================================================================

#[tokio::test]
async fn store_starts_unready_and_logged_out() {
    let provider = MockProvider::new();
    let store = AuthStore::start(provider.clone());
    settle().await;

    assert!(!store.is_ready());
    assert!(!store.is_logged_in());
    assert!(store.identity().is_none());
}

#[tokio::test]
async fn first_signed_out_notification_trips_readiness() {
    let provider = MockProvider::new();
    let store = AuthStore::start(provider.clone());

    provider.publish(SessionState::SignedOut);
    store.wait_for_ready().await;

    assert!(store.is_ready());
    assert!(!store.is_logged_in());
}

#[tokio::test]
async fn first_signed_in_notification_sets_identity() {
    let provider = MockProvider::new();
    let store = AuthStore::start(provider.clone());

    provider.publish(SessionState::SignedIn(test_identity("alice@example.com")));
    store.wait_for_ready().await;

    assert!(store.is_logged_in());
    assert_eq!(store.identity().map(|i| i.email), Some("alice@example.com".into()));
}

#[tokio::test]
async fn readiness_never_reverts() {
    let provider = MockProvider::new();
    let store = AuthStore::start(provider.clone());

    provider.publish(SessionState::SignedIn(test_identity("alice@example.com")));
    store.wait_for_ready().await;
    provider.publish(SessionState::SignedOut);
    settle().await;

    assert!(store.is_ready());
    assert!(!store.is_logged_in());
}

#[tokio::test]
async fn wait_for_ready_suspends_until_first_notification() {
    let provider = MockProvider::new();
    let store = AuthStore::start(provider.clone());

    let waiter = {
        let store = store.clone();
        tokio::spawn(async move { store.wait_for_ready().await })
    };
    settle().await;
    assert!(!waiter.is_finished());

    provider.publish(SessionState::SignedOut);
    waiter.await.unwrap();
}

#[tokio::test]
async fn wait_for_ready_is_immediate_once_ready() {
    let provider = MockProvider::new();
    let store = AuthStore::start(provider.clone());

    provider.publish(SessionState::SignedOut);
    store.wait_for_ready().await;

    // Late callers must not suspend again.
    tokio::time::timeout(Duration::from_millis(50), store.wait_for_ready())
        .await
        .expect("late wait_for_ready should resolve immediately");
}

// =============================================================================
// is_logged_in tracks the latest notification
// =============================================================================

#[tokio::test]
async fn logged_in_tracks_most_recent_notification() {
    let provider = MockProvider::new();
    let store = AuthStore::start(provider.clone());

    provider.publish(SessionState::SignedIn(test_identity("alice@example.com")));
    settle().await;
    assert!(store.is_logged_in());

    provider.publish(SessionState::SignedOut);
    settle().await;
    assert!(!store.is_logged_in());

    provider.publish(SessionState::SignedIn(test_identity("bob@example.com")));
    settle().await;
    assert_eq!(store.identity().map(|i| i.email), Some("bob@example.com".into()));
}

// =============================================================================
// logout
// =============================================================================

#[tokio::test]
async fn logout_success_clears_identity() {
    let provider = MockProvider::new();
    let store = AuthStore::start(provider.clone());

    provider.publish(SessionState::SignedIn(test_identity("alice@example.com")));
    store.wait_for_ready().await;

    store.logout().await.unwrap();
    assert!(!store.is_logged_in());
    assert_eq!(provider.sign_out_calls.load(Ordering::SeqCst), 1);

    // The provider's own notification confirms the state idempotently.
    settle().await;
    assert!(!store.is_logged_in());
    assert!(store.is_ready());
}

#[tokio::test]
async fn logout_failure_leaves_state_untouched() {
    let provider = MockProvider::new();
    let store = AuthStore::start(provider.clone());

    provider.publish(SessionState::SignedIn(test_identity("alice@example.com")));
    store.wait_for_ready().await;

    provider.fail_sign_out.store(true, Ordering::SeqCst);
    let err = store.logout().await.unwrap_err();
    assert!(matches!(err, ProviderError::SessionStorage(_)));

    settle().await;
    assert!(store.is_logged_in(), "failed logout must not alter state");
    assert!(store.is_ready());
}
