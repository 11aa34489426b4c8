mod config;
mod latch;
mod routes;
mod services;
mod shell;
mod state;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let app_config = config::AppConfig::from_env().expect("configuration failed");

    // The provider starts session restoration in the background; the auth
    // store tracks it and trips readiness on the first determination.
    let provider = services::provider::RestIdentityProvider::start(&app_config);
    let auth = services::auth_store::AuthStore::start(provider.clone());
    let api = Arc::new(services::api::RestCommunityApi::new(&app_config));

    tracing::info!(api_base = %app_config.api_base, "neighborlink starting");

    let state = state::AppState::new(app_config, provider, auth, api);
    shell::run(state).await;
}
