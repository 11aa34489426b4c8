use std::sync::Arc;

use super::*;
use crate::services::identity::SessionState;
use crate::state::test_helpers::{MockProvider, settle, test_identity};

fn target(page: Page, requires_auth: bool) -> RouteDescriptor {
    RouteDescriptor { path: "/target", page, requires_auth, redirect: None }
}

async fn ready_store(signed_in: bool) -> (Arc<MockProvider>, Arc<AuthStore>) {
    let provider = MockProvider::new();
    let store = AuthStore::start(provider.clone());
    let state = if signed_in {
        SessionState::SignedIn(test_identity("alice@example.com"))
    } else {
        SessionState::SignedOut
    };
    provider.publish(state);
    store.wait_for_ready().await;
    (provider, store)
}

// =============================================================================
// decision table
// =============================================================================

#[tokio::test]
async fn guarded_target_while_signed_out_redirects_to_login() {
    let (_provider, store) = ready_store(false).await;
    for page in [Page::MyPage, Page::CreateEvent, Page::Events] {
        let decision = decide(&store, &target(page, true), None).await;
        assert_eq!(decision, Decision::Redirect(LOGIN_PATH), "page {page:?}");
    }
}

#[tokio::test]
async fn login_and_signup_while_signed_in_redirect_to_events() {
    let (_provider, store) = ready_store(true).await;
    for page in [Page::Login, Page::SignUp] {
        let decision = decide(&store, &target(page, false), None).await;
        assert_eq!(decision, Decision::Redirect(EVENTS_PATH), "page {page:?}");
    }
}

#[tokio::test]
async fn login_redirect_wins_regardless_of_requires_auth() {
    let (_provider, store) = ready_store(true).await;
    let decision = decide(&store, &target(Page::Login, true), None).await;
    assert_eq!(decision, Decision::Redirect(EVENTS_PATH));
}

#[tokio::test]
async fn unguarded_target_proceeds_while_signed_out() {
    let (_provider, store) = ready_store(false).await;
    for page in [Page::Events, Page::EventDetail, Page::Login, Page::SignUp, Page::NotFound] {
        let decision = decide(&store, &target(page, false), None).await;
        assert_eq!(decision, Decision::Proceed, "page {page:?}");
    }
}

#[tokio::test]
async fn unguarded_non_auth_target_proceeds_while_signed_in() {
    let (_provider, store) = ready_store(true).await;
    for page in [Page::Events, Page::EventDetail, Page::NotFound] {
        let decision = decide(&store, &target(page, false), None).await;
        assert_eq!(decision, Decision::Proceed, "page {page:?}");
    }
}

#[tokio::test]
async fn guarded_target_while_signed_in_proceeds() {
    let (_provider, store) = ready_store(true).await;
    let decision = decide(&store, &target(Page::MyPage, true), None).await;
    assert_eq!(decision, Decision::Proceed);
}

// =============================================================================
// readiness gating
// =============================================================================

#[tokio::test]
async fn evaluation_suspends_until_first_determination() {
    let provider = MockProvider::new();
    let store = AuthStore::start(provider.clone());

    let pending = {
        let store = store.clone();
        tokio::spawn(async move { decide(&store, &target(Page::MyPage, true), None).await })
    };
    settle().await;
    assert!(!pending.is_finished(), "guard must wait for the first determination");

    provider.publish(SessionState::SignedOut);
    assert_eq!(pending.await.unwrap(), Decision::Redirect(LOGIN_PATH));
}

#[tokio::test]
async fn evaluation_after_readiness_uses_fresh_state() {
    let (provider, store) = ready_store(false).await;
    assert_eq!(
        decide(&store, &target(Page::MyPage, true), None).await,
        Decision::Redirect(LOGIN_PATH)
    );

    provider.publish(SessionState::SignedIn(test_identity("alice@example.com")));
    settle().await;
    assert_eq!(decide(&store, &target(Page::MyPage, true), None).await, Decision::Proceed);
}
