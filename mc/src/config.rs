//! MindCare configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::DEFAULT_GREETING;
use crate::events::DEFAULT_CHANNEL_CAPACITY;

/// Main MindCare configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Event bus configuration
    pub events: EventsConfig,

    /// Session configuration
    pub sessions: SessionsConfig,

    /// Simulated reply configuration
    pub replies: ReplyConfig,

    /// Login persistence configuration
    pub auth: AuthConfig,
}

impl Config {
    /// Validate configuration before use
    pub fn validate(&self) -> Result<()> {
        if self.events.capacity == 0 {
            return Err(eyre::eyre!("events.capacity must be greater than zero"));
        }
        if self.replies.min_delay_ms > self.replies.max_delay_ms {
            return Err(eyre::eyre!(
                "replies.min-delay-ms ({}) must not exceed replies.max-delay-ms ({})",
                self.replies.min_delay_ms,
                self.replies.max_delay_ms
            ));
        }
        if self.sessions.greeting.trim().is_empty() {
            return Err(eyre::eyre!("sessions.greeting must not be empty"));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .mindcare.yml
        let local_config = PathBuf::from(".mindcare.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/mindcare/mindcare.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("mindcare").join("mindcare.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Errors are ignored here; `load` reports them once logging is up.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = match config_path {
            Some(path) => vec![path.clone()],
            None => {
                let mut paths = vec![PathBuf::from(".mindcare.yml")];
                if let Some(config_dir) = dirs::config_dir() {
                    paths.push(config_dir.join("mindcare").join("mindcare.yml"));
                }
                paths
            }
        };

        candidates
            .iter()
            .find(|p| p.exists())
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|content| serde_yaml::from_str::<Self>(&content).ok())
            .and_then(|config| config.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Event bus configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Broadcast channel capacity
    pub capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    /// Counselor greeting every session opens with
    pub greeting: String,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
        }
    }
}

/// Simulated reply configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyConfig {
    /// Simulate the student side after each counselor message
    pub enabled: bool,

    /// Shortest delay before a simulated reply
    #[serde(rename = "min-delay-ms")]
    pub min_delay_ms: u64,

    /// Longest delay before a simulated reply
    #[serde(rename = "max-delay-ms")]
    pub max_delay_ms: u64,
}

impl ReplyConfig {
    pub fn min_delay(&self) -> Duration {
        Duration::from_millis(self.min_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_delay_ms: 1000,
            max_delay_ms: 2500,
        }
    }
}

/// Login persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Directory holding the saved login record
    #[serde(rename = "store-dir")]
    pub store_dir: PathBuf,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            store_dir: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("mindcare"),
        }
    }
}
