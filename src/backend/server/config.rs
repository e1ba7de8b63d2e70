/**
 * Server Configuration
 *
 * This module resolves the reporter configuration once at startup.
 *
 * # Configuration Sources
 *
 * 1. The TOML file named by `REPORTER_CONFIG`, if set
 * 2. Otherwise environment variables (see `ReporterConfig::from_env`)
 *
 * # Error Handling
 *
 * Configuration errors are logged but do not prevent server startup. The
 * server falls back to the defaults, which disable remote reporting.
 */

use crate::shared::ReporterConfig;

/// Environment variable naming an optional TOML configuration file
pub const CONFIG_PATH_VAR: &str = "REPORTER_CONFIG";

/// Load the reporter configuration
///
/// # Returns
///
/// The configured `ReporterConfig`, or the defaults if loading failed.
pub fn load_reporter_config() -> ReporterConfig {
    let loaded = match std::env::var(CONFIG_PATH_VAR) {
        Ok(path) if !path.trim().is_empty() => {
            tracing::info!("Loading reporter configuration from {}", path);
            ReporterConfig::from_toml_file(&path)
        }
        _ => ReporterConfig::from_env(),
    };

    match loaded {
        Ok(config) => {
            if !config.remote_enabled() {
                tracing::warn!("No webhook URL configured. Remote error reporting will be disabled.");
            }
            config
        }
        Err(e) => {
            tracing::error!("Failed to load reporter configuration: {}", e);
            tracing::warn!("Using default reporter configuration, remote error reporting disabled.");
            ReporterConfig::default()
        }
    }
}

/// Port the HTTP server listens on (`SERVER_PORT`, default 3000)
pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .ok()
        .and_then(|port| port.parse::<u16>().ok())
        .unwrap_or(3000)
}
