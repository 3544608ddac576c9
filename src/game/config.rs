use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::timeline::DEFAULT_MAX_LENGTH;

/// Controller configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Record moves into a timeline
    pub history_enabled: bool,
    /// Oldest entries are evicted past this many
    pub max_history_length: NonZeroUsize,
    /// Reject sloppy move tokens instead of guessing
    pub strict_mode: bool,
    /// Forward diagnostics to the installed sink
    pub logging_enabled: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            history_enabled: true,
            max_history_length: NonZeroUsize::new(DEFAULT_MAX_LENGTH)
                .unwrap_or(NonZeroUsize::MIN),
            strict_mode: false,
            logging_enabled: false,
        }
    }
}

impl GameConfig {
    pub fn with_history(mut self, enabled: bool) -> Self {
        self.history_enabled = enabled;
        self
    }

    pub fn with_max_history_length(mut self, length: NonZeroUsize) -> Self {
        self.max_history_length = length;
        self
    }

    pub fn with_strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.logging_enabled = enabled;
        self
    }

    /// Get the default config file path
    pub fn default_config_file() -> Result<PathBuf> {
        ProjectDirs::from("dev", "ply", "ply")
            .map(|proj_dirs| proj_dirs.config_dir().join("config.toml"))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    /// Load configuration from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))
    }

    /// Load the platform config file, or defaults if there is none
    pub fn load_or_default() -> Result<Self> {
        let config_file = Self::default_config_file()?;
        if config_file.exists() {
            Self::load(&config_file)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path, content).context("Failed to write configuration file")?;

        Ok(())
    }
}
