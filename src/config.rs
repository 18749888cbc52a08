//! Configuration discovery and loading
//!
//! Discovery order:
//! 1. Current directory: ./taskboard.toml
//! 2. User config: ~/.taskboard/config.toml
//! 3. Built-in defaults

use crate::env;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// How the coordinator settles optimistic mutations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Replace the hierarchy with the backend's after every successful write
    pub refetch_after_mutation: bool,
    /// Put back the pre-mutation forest when a write fails
    pub restore_snapshot_on_failure: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            refetch_after_mutation: true,
            restore_snapshot_on_failure: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskboardConfig {
    pub sync: SyncConfig,
    /// Tracing filter used when the environment does not set one
    pub log_filter: String,
}

impl Default for TaskboardConfig {
    fn default() -> Self {
        Self {
            sync: SyncConfig::default(),
            log_filter: env::DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl TaskboardConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Save configuration to a TOML file
    pub fn to_toml_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml_string()?;
        fs::write(path, content).context("Failed to write config file")
    }

    /// Convert configuration to a TOML string
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }
}

/// Configuration discovery system
pub struct ConfigDiscovery;

impl ConfigDiscovery {
    /// Load the first config file found, or defaults when there is none
    pub fn discover_config() -> Result<TaskboardConfig> {
        if let Some(config_path) = Self::find_config_file() {
            info!("Loading configuration from: {:?}", config_path);
            return TaskboardConfig::from_toml_file(config_path);
        }

        info!("No configuration file found, using defaults");
        Ok(TaskboardConfig::default())
    }

    pub fn find_config_file() -> Option<PathBuf> {
        Self::config_candidates().into_iter().find(|candidate| {
            debug!("Checking for config file: {:?}", candidate);
            candidate.is_file()
        })
    }

    /// Candidate paths in priority order
    pub fn config_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Ok(current_dir) = std::env::current_dir() {
            candidates.push(env::local_config_file_path(&current_dir));
        }

        if let Some(home_dir) = env::home_dir() {
            candidates.push(env::user_config_file_path(&home_dir));
        }

        candidates
    }
}
