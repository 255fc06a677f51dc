mod defaults;


use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::BotError;
use defaults::*;

/// Top-level Prosperez configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Bot identity and command surface. Immutable after startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Display name (e.g. "Prosperez"). Menu headers render it uppercase.
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_owner")]
    pub owner: String,
    /// Command prefix. Messages not starting with it are ignored.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Operating mode label shown in banners (e.g. "Public").
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default = "default_version")]
    pub version: String,
    /// Declared plugin count. A display label, not a functional count.
    #[serde(default = "default_plugins")]
    pub plugins: u32,
    /// Hosting platform label shown in status replies.
    #[serde(default = "default_host")]
    pub host: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            owner: default_owner(),
            prefix: default_prefix(),
            mode: default_mode(),
            version: default_version(),
            plugins: default_plugins(),
            host: default_host(),
        }
    }
}

/// Session / credential store settings.
///
/// Credentials are stored at `{data_dir}/whatsapp_session/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Device name shown under "Linked Devices" on the phone.
    #[serde(default = "default_device_name")]
    pub device_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            device_name: default_device_name(),
        }
    }
}

impl SessionConfig {
    /// Directory holding the credential store.
    pub fn session_dir(&self) -> String {
        format!("{}/whatsapp_session", shellexpand(&self.data_dir))
    }

    /// Directory for log files.
    pub fn logs_dir(&self) -> String {
        format!("{}/logs", shellexpand(&self.data_dir))
    }
}

/// Logging settings. `RUST_LOG` takes precedence over `level`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Also write logs to `{data_dir}/logs/prosperez.log`.
    #[serde(default = "default_true")]
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_true(),
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Where a loaded configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    /// The file did not exist; every value is a default.
    Defaults,
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist. Runs before logging
/// is set up, so the caller reports the source.
pub fn load(path: &str) -> Result<(Config, ConfigSource), BotError> {
    let path = Path::new(path);
    let (config, source) = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BotError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config = toml::from_str(&content)
            .map_err(|e| BotError::Config(format!("failed to parse config: {}", e)))?;
        (config, ConfigSource::File)
    } else {
        (Config::default(), ConfigSource::Defaults)
    };

    validate(&config)?;
    Ok((config, source))
}

fn validate(config: &Config) -> Result<(), BotError> {
    if config.bot.prefix.trim().is_empty() {
        return Err(BotError::Config(
            "bot.prefix must be a non-empty, non-whitespace string".into(),
        ));
    }
    Ok(())
}
