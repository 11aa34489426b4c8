//! Domain services behind the navigation layer.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the identity provider, auth state, and community API
//! plumbing so the router and shell can stay focused on navigation and
//! presentation.

pub mod api;
pub mod auth_store;
pub mod events;
pub mod identity;
pub mod profile;
pub mod provider;
