//! Navigation layer: route table, path matching, and the router.
//!
//! SYSTEM CONTEXT
//! ==============
//! The shell never swaps pages directly; every screen change goes through
//! `Router::navigate`, which resolves the path against the static table and
//! runs the guard before committing. Redirect targets are re-evaluated the
//! same way, so the guard also vets its own redirects. The table keeps the
//! guard's redirect destinations (`/login`, `/events`) unguarded, which is
//! what makes those redirects terminal.

pub mod guard;

use std::sync::Arc;

use guard::Decision;

use crate::services::auth_store::AuthStore;

pub const LOGIN_PATH: &str = "/login";
pub const SIGNUP_PATH: &str = "/signup";
pub const EVENTS_PATH: &str = "/events";
pub const CREATE_EVENT_PATH: &str = "/events/new";
pub const MYPAGE_PATH: &str = "/mypage";

/// Upper bound on redirect hops per navigation. The static table cannot
/// cycle, so hitting this means the table was misconfigured.
const MAX_REDIRECT_HOPS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    SignUp,
    Events,
    EventDetail,
    CreateEvent,
    MyPage,
    NotFound,
}

/// One route table entry. Immutable configuration.
#[derive(Debug, Clone, Copy)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub page: Page,
    /// Unreachable without a signed-in identity. Absent means `false`.
    pub requires_auth: bool,
    /// Table-level redirect, applied before the guard runs.
    pub redirect: Option<&'static str>,
}

const NOT_FOUND: RouteDescriptor = RouteDescriptor {
    path: "*",
    page: Page::NotFound,
    requires_auth: false,
    redirect: None,
};

/// Static route table. `/events/new` is listed before `/events/:id` so the
/// literal segment wins over the parameter.
const ROUTES: &[RouteDescriptor] = &[
    RouteDescriptor { path: "/", page: Page::SignUp, requires_auth: false, redirect: Some(SIGNUP_PATH) },
    RouteDescriptor { path: LOGIN_PATH, page: Page::Login, requires_auth: false, redirect: None },
    RouteDescriptor { path: SIGNUP_PATH, page: Page::SignUp, requires_auth: false, redirect: None },
    RouteDescriptor { path: EVENTS_PATH, page: Page::Events, requires_auth: false, redirect: None },
    RouteDescriptor { path: CREATE_EVENT_PATH, page: Page::CreateEvent, requires_auth: true, redirect: None },
    RouteDescriptor { path: "/events/:id", page: Page::EventDetail, requires_auth: false, redirect: None },
    RouteDescriptor { path: MYPAGE_PATH, page: Page::MyPage, requires_auth: true, redirect: None },
];

// =============================================================================
// MATCHING
// =============================================================================

/// A resolved navigation target: the matched descriptor plus extracted
/// `:param` values and the concrete path navigated to.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub descriptor: RouteDescriptor,
    pub params: Vec<(String, String)>,
    pub path: String,
}

impl RouteMatch {
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

fn split_segments(path: &str) -> Vec<&str> {
    path.trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect()
}

/// Match a concrete path against a pattern, extracting `:param` segments.
fn match_pattern(pattern: &str, path: &str) -> Option<Vec<(String, String)>> {
    let pattern_segments = split_segments(pattern);
    let path_segments = split_segments(path);
    if pattern_segments.len() != path_segments.len() {
        return None;
    }

    let mut params = Vec::new();
    for (expected, got) in pattern_segments.iter().zip(&path_segments) {
        if let Some(name) = expected.strip_prefix(':') {
            params.push((name.to_owned(), (*got).to_owned()));
        } else if expected != got {
            return None;
        }
    }
    Some(params)
}

/// Resolve a path against a table. Unknown paths fall through to the
/// NotFound descriptor so the shell always has something to render.
fn resolve(routes: &[RouteDescriptor], path: &str) -> RouteMatch {
    for route in routes {
        if let Some(params) = match_pattern(route.path, path) {
            return RouteMatch { descriptor: *route, params, path: path.to_owned() };
        }
    }
    RouteMatch { descriptor: NOT_FOUND, params: Vec::new(), path: path.to_owned() }
}

// =============================================================================
// ROUTER
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("redirect loop detected after {MAX_REDIRECT_HOPS} hops (ended at {0})")]
    RedirectLoop(String),
}

/// Owns the current location and serializes navigations.
pub struct Router {
    auth: Arc<AuthStore>,
    routes: &'static [RouteDescriptor],
    current: Option<RouteMatch>,
}

impl Router {
    #[must_use]
    pub fn new(auth: Arc<AuthStore>) -> Self {
        Self { auth, routes: ROUTES, current: None }
    }

    /// Router over a custom table, for exercising table misconfigurations.
    #[cfg(test)]
    fn with_table(auth: Arc<AuthStore>, routes: &'static [RouteDescriptor]) -> Self {
        Self { auth, routes, current: None }
    }

    /// The committed location, if any navigation has completed.
    #[must_use]
    pub fn current(&self) -> Option<&RouteMatch> {
        self.current.as_ref()
    }

    /// Navigate to `path`: apply table redirects, run the guard, follow
    /// guard redirects by re-evaluating against the new target, then commit
    /// the final match as the current location and return it.
    ///
    /// Takes `&mut self`, so navigations are single-flight by construction.
    ///
    /// # Errors
    ///
    /// Returns `NavError::RedirectLoop` if the redirect-hop cap is exceeded,
    /// which only a misconfigured route table can cause.
    pub async fn navigate(&mut self, path: &str) -> Result<RouteMatch, NavError> {
        let mut path = path.to_owned();
        for _ in 0..MAX_REDIRECT_HOPS {
            let target = resolve(self.routes, &path);
            if let Some(to) = target.descriptor.redirect {
                tracing::debug!(from = %path, to, "table redirect");
                path = to.to_owned();
                continue;
            }

            let origin = self.current.as_ref().map(|m| m.descriptor);
            match guard::decide(&self.auth, &target.descriptor, origin.as_ref()).await {
                Decision::Proceed => {
                    tracing::info!(to = %target.path, page = ?target.descriptor.page, "navigation committed");
                    self.current = Some(target.clone());
                    return Ok(target);
                }
                Decision::Redirect(to) => {
                    tracing::info!(from = %path, to, "guard redirect");
                    path = to.to_owned();
                }
            }
        }
        Err(NavError::RedirectLoop(path))
    }
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
