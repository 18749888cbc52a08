//! Environment constants and path utilities for taskboard.
//!
//! Config file names, the logging environment variable and the helpers that
//! build discovery paths live here.

use std::path::{Path, PathBuf};

/// User-level directory name (hidden directory in the home folder)
pub const TASKBOARD_DIR_NAME: &str = ".taskboard";

/// Config file name inside the user directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Config file name looked up in the current directory
pub const LOCAL_CONFIG_FILE_NAME: &str = "taskboard.toml";

/// Environment variable holding the tracing filter
pub const LOG_ENV_VAR: &str = "TASKBOARD_LOG";

/// Filter used when neither the environment nor the config names one
pub const DEFAULT_LOG_FILTER: &str = "taskboard=info";

/// Build the local config file path in the current directory
pub fn local_config_file_path(current_dir: &Path) -> PathBuf {
    current_dir.join(LOCAL_CONFIG_FILE_NAME)
}

/// Build the config directory path in the user's home directory
pub fn user_config_dir_path(home_dir: &Path) -> PathBuf {
    home_dir.join(TASKBOARD_DIR_NAME)
}

/// Build the config file path in the user's home directory
pub fn user_config_file_path(home_dir: &Path) -> PathBuf {
    user_config_dir_path(home_dir).join(CONFIG_FILE_NAME)
}

/// Home directory from `HOME` or `USERPROFILE`
pub fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .or_else(|| std::env::var("USERPROFILE").ok())
        .map(PathBuf::from)
}
