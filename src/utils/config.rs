use crate::utils::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV: &str = "UFO_FOLD_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub folding: FoldingConfig,
    pub host: HostConfig,
    pub render: RenderConfig,
    pub channel: ChannelConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FoldingConfig {
    /// Name the editor uses to invoke the folding-range command
    pub command: String,
    /// Wait before re-checking an unattached buffer (milliseconds)
    pub readiness_retry_delay: u64,
    /// Wait before re-checking provider capability (milliseconds)
    pub capability_retry_delay: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Lua module answering document and provider queries
    pub module: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Lua module receiving the init/dispose notifications
    pub module: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Timeout for calls into the editor (milliseconds)
    pub call_timeout: u64,
    /// Longest accepted channel line (bytes)
    pub max_message_size: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub filter: Option<String>,
    pub file: Option<PathBuf>,
}

impl Default for FoldingConfig {
    fn default() -> Self {
        Self {
            command: "ufo.foldingRange".to_string(),
            readiness_retry_delay: 50,
            capability_retry_delay: 500,
        }
    }
}

impl FoldingConfig {
    pub fn readiness_retry_delay(&self) -> Duration {
        Duration::from_millis(self.readiness_retry_delay)
    }

    pub fn capability_retry_delay(&self) -> Duration {
        Duration::from_millis(self.capability_retry_delay)
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            module: "ufo.provider.lsp.bridge".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            module: "ufo.provider.lsp.coc".to_string(),
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            call_timeout: 30000,
            max_message_size: 1024 * 1024, // 1MB
        }
    }
}

impl ChannelConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout)
    }
}

impl Config {
    /// Load from `$UFO_FOLD_CONFIG` or `~/.config/ufo-fold/config.toml`,
    /// falling back to defaults when neither exists.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => {
                let config = Self::from_file(&path)?;
                info!("Loaded config from {}", path.display());
                Ok(config)
            }
            _ => Ok(Self::default()),
        }
    }

    fn config_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        let home = std::env::var("HOME").ok()?;
        Some(Path::new(&home).join(".config/ufo-fold/config.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.folding.command.trim().is_empty() {
            return Err(Error::config("folding.command must not be empty"));
        }
        if self.host.module.trim().is_empty() {
            return Err(Error::config("host.module must not be empty"));
        }
        if self.render.module.trim().is_empty() {
            return Err(Error::config("render.module must not be empty"));
        }
        if self.channel.max_message_size == 0 {
            return Err(Error::config("channel.max_message_size must be positive"));
        }
        Ok(())
    }

    /// Log file path, defaulting to a per-process file in the temp dir
    pub fn log_file(&self) -> PathBuf {
        self.log.file.clone().unwrap_or_else(|| {
            std::env::temp_dir().join(format!("ufo-fold-{}.log", std::process::id()))
        })
    }
}
