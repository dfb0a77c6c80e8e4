use habit_session::{DEFAULT_REPLIES, DEFAULT_SUGGESTIONS};
use serde::{Deserialize, Serialize};

/// Longest reply delay accepted by validation
pub const MAX_REPLY_DELAY_MS: u64 = 60_000;

/// Top-level config file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub version: String,
    #[serde(default)]
    pub simulator: SimulatorSettings,
    #[serde(default)]
    pub suggestions: SuggestionSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            simulator: SimulatorSettings::default(),
            suggestions: SuggestionSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Read a value by dotted key, e.g. `simulator.reply_delay_ms`.
    /// `Ok(None)` means the key exists but is unset.
    pub fn get_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let parts: Vec<&str> = key.split('.').collect();
        let value = match parts.as_slice() {
            ["version"] => Some(self.version.clone()),
            ["simulator", "reply_delay_ms"] => Some(self.simulator.reply_delay_ms.to_string()),
            ["simulator", "seed"] => self.simulator.seed.map(|s| s.to_string()),
            ["simulator", "replies"] => Some(self.simulator.replies.len().to_string()),
            ["suggestions", "chips"] => Some(self.suggestions.chips.join(", ")),
            ["logging", "level"] => Some(self.logging.level.to_string()),
            ["logging", "file"] => self.logging.file.clone(),
            _ => return Err(ConfigError::KeyNotFound(key.to_string())),
        };
        Ok(value)
    }

    /// Set a value by dotted key. List-valued keys are read-only here.
    pub fn set_value(&mut self, key: &str, value: &str) -> ConfigResult<()> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["simulator", "reply_delay_ms"] => {
                self.simulator.reply_delay_ms = value.parse().map_err(|_| {
                    ConfigError::Validation(format!("Invalid number: {}", value))
                })?;
            }
            ["simulator", "seed"] => {
                self.simulator.seed = match value {
                    "" | "none" | "null" => None,
                    v => Some(v.parse().map_err(|_| {
                        ConfigError::Validation(format!("Invalid seed: {}", v))
                    })?),
                };
            }
            ["logging", "level"] => {
                self.logging.level = value.parse()?;
            }
            ["logging", "file"] => {
                self.logging.file = Some(value.to_string());
            }
            _ => return Err(ConfigError::KeyNotFound(key.to_string())),
        }
        Ok(())
    }
}

/// Goal-chat simulator settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulatorSettings {
    /// Delay before the scripted reply ("assistant is typing")
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,
    /// Fixed seed for reply selection; entropy when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default = "default_replies")]
    pub replies: Vec<String>,
}

fn default_reply_delay_ms() -> u64 {
    1500
}

fn default_replies() -> Vec<String> {
    DEFAULT_REPLIES.iter().map(|r| r.to_string()).collect()
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            reply_delay_ms: default_reply_delay_ms(),
            seed: None,
            replies: default_replies(),
        }
    }
}

/// Suggestion source settings. An empty list means the built-in chips.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestionSettings {
    #[serde(default = "default_chips")]
    pub chips: Vec<String>,
}

fn default_chips() -> Vec<String> {
    DEFAULT_SUGGESTIONS.iter().map(|c| c.to_string()).collect()
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            chips: default_chips(),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::Validation(format!("Invalid log level: {}", s))),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
    /// Log file; `None` disables logging since the TUI owns the terminal
    #[serde(default)]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: Some("~/.consistency30/logs/habit-tui.log".to_string()),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.simulator.reply_delay_ms, 1500);
        assert_eq!(config.simulator.replies.len(), 4);
        assert_eq!(config.suggestions.chips.len(), 11);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = serde_json::from_str(r#"{"version": "0.1.0"}"#).unwrap();
        assert_eq!(config.simulator, SimulatorSettings::default());
        assert_eq!(config.suggestions, SuggestionSettings::default());
    }

    #[test]
    fn test_partial_simulator_section() {
        let config: Config = serde_json::from_str(
            r#"{"version": "0.1.0", "simulator": {"reply_delay_ms": 300, "seed": 9}}"#,
        )
        .unwrap();
        assert_eq!(config.simulator.reply_delay_ms, 300);
        assert_eq!(config.simulator.seed, Some(9));
        assert_eq!(config.simulator.replies.len(), 4);
    }

    #[test]
    fn test_get_and_set_value() {
        let mut config = Config::default();
        config.set_value("simulator.reply_delay_ms", "250").unwrap();
        config.set_value("simulator.seed", "17").unwrap();
        config.set_value("logging.level", "WARNING").unwrap();

        assert_eq!(config.get_value("simulator.reply_delay_ms").unwrap(), Some("250".to_string()));
        assert_eq!(config.get_value("simulator.seed").unwrap(), Some("17".to_string()));
        assert_eq!(config.get_value("logging.level").unwrap(), Some("warn".to_string()));

        config.set_value("simulator.seed", "none").unwrap();
        assert_eq!(config.get_value("simulator.seed").unwrap(), None);
        assert!(matches!(config.get_value("server.port"), Err(ConfigError::KeyNotFound(_))));
    }

    #[test]
    fn test_set_value_errors() {
        let mut config = Config::default();
        assert!(matches!(
            config.set_value("simulator.reply_delay_ms", "soon"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            config.set_value("server.port", "80"),
            Err(ConfigError::KeyNotFound(_))
        ));
    }
}
