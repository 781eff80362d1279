//! Configuration types for chatpair.
//!
//! `AppConfig` represents the `config.toml` in the data directory that
//! controls the listen address, allowed CORS origins, the greeting seeded
//! into an empty conversation, and the canned bot replies.

use serde::{Deserialize, Serialize};

/// Top-level configuration. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed by CORS. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Bot message inserted when the conversation is empty. An empty string disables seeding.
    #[serde(default = "default_greeting")]
    pub greeting: Option<String>,

    /// Replacement list of canned bot replies. Empty keeps the built-in list.
    #[serde(default)]
    pub responses: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_greeting() -> Option<String> {
    Some("Hi there! Thanks for stopping by. Where would you like to start?".to_string())
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            greeting: default_greeting(),
            responses: Vec::new(),
        }
    }
}
