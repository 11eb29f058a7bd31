//! The config module defines the application configuration. It is based on [config], a layered
//! configuration system for Rust applications.
//!
//! # Layers
//!
//! Upper layers overwrite lower layer configurations.
//!
//! ## Layer 1 (Environment variables) \[optional\]
//!
//! Environment variables have the format `MCSERVER_[field]` (nested fields are not used by this
//! configuration, so no separator beyond the prefix is needed). They overwrite any previous
//! configuration.
//!
//! ## Layer 2 (Custom configuration) \[optional\]
//!
//! An optional configuration file intended for deployments and local testing. The location is
//! controlled by the `CONFIG_FILE` environment variable, defaulting to `config/config`. It can be
//! of any file type supported by [config] (e.g. `config/config.toml`).
//!
//! ## Layer 3 (Default configuration)
//!
//! Default values for every field, defined directly on [`Config`].
//!
//! # Usage
//!
//! ```rs
//! let config = Config::read()?;
//! ```

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

/// The default listen address used both as the [`Config::default`] value and as the CLI default.
pub const DEFAULT_ADDRESS: &str = "0.0.0.0:25565";

/// [`Config`] holds all configuration for the server core. One immutable instance is created on
/// startup and then shared among every session task.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The address the TCP acceptor binds to.
    pub server_address: String,

    /// The MOTD shown in the status response, as a plain string (wrapped into chat JSON).
    pub description: String,

    /// The maximum number of players advertised in the status response.
    pub max_players: u32,

    /// Whether to perform the encryption handshake and Mojang session verification.
    pub online_mode: bool,

    /// The byte threshold above which outbound packets are zlib-compressed. `None` disables
    /// compression entirely.
    pub compression_threshold: Option<i32>,

    /// Whether to report "is debug" / "reduced debug info" in the `Play` packet.
    pub is_debug: bool,

    /// The view distance (in chunks) reported to the client.
    pub view_distance: i32,

    /// The simulation distance (in chunks) reported to the client.
    pub simulation_distance: i32,

    /// Seconds between keep-alive broadcasts.
    pub keep_alive_send_interval: u64,

    /// Seconds of silence after which a player is kicked for timing out.
    pub player_timeout: u64,

    /// The byte length of the verify token issued during login.
    pub verify_token_length: usize,

    /// Path to the dimension codec JSON document, loaded once at startup.
    pub dimension_codec_path: String,

    /// Milliseconds the accept loop waits after a transient `accept()` failure before retrying.
    pub accept_error_backoff_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: DEFAULT_ADDRESS.to_string(),
            description: "A Minecraft Server".to_string(),
            max_players: 20,
            online_mode: true,
            compression_threshold: Some(256),
            is_debug: false,
            view_distance: 10,
            simulation_distance: 10,
            keep_alive_send_interval: 10,
            player_timeout: 30,
            verify_token_length: 4,
            dimension_codec_path: "data/1_19/dimension_codec.json".to_string(),
            accept_error_backoff_ms: 50,
        }
    }
}

impl Config {
    /// Creates a new application configuration as described in the [module documentation](crate::config).
    pub fn read() -> Result<Self, ConfigError> {
        let env_prefix = env::var("ENV_PREFIX").unwrap_or_else(|_| "mcserver".into());
        let config_file = env::var("CONFIG_FILE").unwrap_or_else(|_| "config/config".into());

        let s = config::Config::builder()
            .add_source(File::with_name(&config_file).required(false))
            .add_source(Environment::with_prefix(&env_prefix).separator("_"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sane_values() {
        let config = Config::default();
        assert_eq!(config.server_address, DEFAULT_ADDRESS);
        assert!(config.online_mode);
        assert_eq!(config.verify_token_length, 4);
    }

    #[test]
    fn reads_without_any_external_source() {
        // clear any stray env vars from other tests running in the same process
        unsafe {
            env::remove_var("CONFIG_FILE");
            env::remove_var("ENV_PREFIX");
        }
        let config = Config::read().expect("failed to read default configuration");
        assert_eq!(config.server_address, DEFAULT_ADDRESS);
    }
}
