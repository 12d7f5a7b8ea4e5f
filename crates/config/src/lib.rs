use dotenv::dotenv;
use std::env;

/// Runtime configuration for the storage backend.
#[derive(Debug)]
pub struct Config {
    pub database_path: String,
    pub autosave_debounce_ms: u64,
}

impl Config {
    /// Load configuration from the environment (a root `.env` file is picked
    /// up if present), falling back to defaults suitable for local use.
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_path =
            env::var("POKEDREAM_DATABASE").unwrap_or_else(|_| "dream_network.db".to_string());

        let autosave_debounce_ms = env::var("POKEDREAM_AUTOSAVE_MS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(1000);

        Self {
            database_path,
            autosave_debounce_ms,
        }
    }
}
