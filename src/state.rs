//! Shared application state.
//!
//! DESIGN
//! ======
//! Everything the shell and router need is built once in `main` and passed
//! around explicitly: the identity provider, the auth store tracking it, and
//! the community API client. No module-level singletons; tests inject the
//! scripted doubles from `test_helpers`.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::api::CommunityApi;
use crate::services::auth_store::AuthStore;
use crate::services::identity::IdentityProvider;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub provider: Arc<dyn IdentityProvider>,
    pub auth: Arc<AuthStore>,
    pub api: Arc<dyn CommunityApi>,
}

impl AppState {
    #[must_use]
    pub fn new(
        config: AppConfig,
        provider: Arc<dyn IdentityProvider>,
        auth: Arc<AuthStore>,
        api: Arc<dyn CommunityApi>,
    ) -> Self {
        Self { config, provider, auth, api }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
