//! Application configuration.
//!
//! Loaded once at startup from environment variables (`.env` is read by
//! dotenvy in `main`). Only the API key is required; endpoint bases and the
//! session file default to the hosted service's values.

use std::path::PathBuf;

const DEFAULT_IDENTITY_BASE: &str = "https://identitytoolkit.googleapis.com";
const DEFAULT_TOKEN_BASE: &str = "https://securetoken.googleapis.com";
const DEFAULT_API_BASE: &str = "https://api.neighborlink.app";
const DEFAULT_SESSION_FILE: &str = ".neighborlink-session";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API key passed to the identity endpoints as a query parameter.
    pub api_key: String,
    /// Base URL of the identity (sign-up / sign-in) API.
    pub identity_base: String,
    /// Base URL of the token refresh API.
    pub token_base: String,
    /// Base URL of the community events API.
    pub api_base: String,
    /// Local file holding the persisted refresh token between runs.
    pub session_file: PathBuf,
}

impl AppConfig {
    /// Load from `NL_API_KEY` (required) plus `NL_IDENTITY_BASE`,
    /// `NL_TOKEN_BASE`, `NL_API_BASE`, and `NL_SESSION_FILE` (defaulted).
    ///
    /// # Errors
    ///
    /// Returns an error naming the variable if `NL_API_KEY` is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("NL_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingVar("NL_API_KEY"))?;

        Ok(Self {
            api_key,
            identity_base: env_or("NL_IDENTITY_BASE", DEFAULT_IDENTITY_BASE),
            token_base: env_or("NL_TOKEN_BASE", DEFAULT_TOKEN_BASE),
            api_base: env_or("NL_API_BASE", DEFAULT_API_BASE),
            session_file: PathBuf::from(env_or("NL_SESSION_FILE", DEFAULT_SESSION_FILE)),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
