pub mod config;
pub mod manager;

pub use config::{
    Config, ConfigError, ConfigResult, LogLevel, LoggingConfig, SimulatorSettings,
    SuggestionSettings, MAX_REPLY_DELAY_MS,
};
pub use manager::ConfigManager;

use std::path::PathBuf;

/// `~/.consistency30`
pub fn app_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".consistency30"))
}

/// `~/.consistency30/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join("config.json"))
}

/// Expand a leading `~/` to the home directory
pub fn expand_tilde(path: &str) -> Option<PathBuf> {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
        None => Some(PathBuf::from(path)),
    }
}
