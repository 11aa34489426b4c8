//! Navigation guard.
//!
//! DESIGN
//! ======
//! Runs before every navigation commit: waits for the first auth
//! determination, then applies the access rules for the target route.
//! Per navigation this is PENDING -> EVALUATED -> {PROCEED, REDIRECT};
//! readiness never rejects, so there is no retry state. An unauthorized
//! target is a redirect, never an error.

use super::{EVENTS_PATH, LOGIN_PATH, Page, RouteDescriptor};
use crate::services::auth_store::AuthStore;

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Redirect(&'static str),
}

/// Decide whether a navigation to `target` may proceed.
///
/// Suspends until the auth store has seen its first provider notification;
/// navigations starting after that point resolve immediately. First matching
/// rule wins:
/// 1. guarded target while signed out redirects to the login page
/// 2. login/signup while signed in redirects to the events list
/// 3. everything else proceeds
pub async fn decide(
    auth: &AuthStore,
    target: &RouteDescriptor,
    origin: Option<&RouteDescriptor>,
) -> Decision {
    if !auth.is_ready() {
        tracing::debug!(to = target.path, "navigation suspended until first auth determination");
    }
    auth.wait_for_ready().await;
    let logged_in = auth.is_logged_in();

    let decision = if target.requires_auth && !logged_in {
        Decision::Redirect(LOGIN_PATH)
    } else if matches!(target.page, Page::Login | Page::SignUp) && logged_in {
        Decision::Redirect(EVENTS_PATH)
    } else {
        Decision::Proceed
    };

    tracing::debug!(
        from = origin.map_or("(start)", |o| o.path),
        to = target.path,
        requires_auth = target.requires_auth,
        logged_in,
        ?decision,
        "guard evaluated"
    );
    decision
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
