//! Loading and saving forest files
//!
//! A forest file is a JSON array of wire-form tasks, nested through
//! `subTasks`.

use crate::task::{Task, TaskStore, decode_forest, encode_forest};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("File '{path}' not found")]
    NotFound { path: PathBuf },

    #[error("IO error on '{path}': {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Forest parsing error in '{path}': {reason}")]
    ParseError { path: PathBuf, reason: String },
}

/// Reads and writes forest files
pub struct ForestFile;

impl ForestFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<Task>, FileError> {
        let path = path.as_ref().to_path_buf();
        debug!("Loading forest file: {:?}", path);

        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FileError::NotFound { path: path.clone() },
            _ => FileError::IoError {
                path: path.clone(),
                source: e,
            },
        })?;

        decode_forest(&content).map_err(|e| FileError::ParseError {
            path,
            reason: e.to_string(),
        })
    }

    /// Load a file straight into a fresh store
    pub fn load_store<P: AsRef<Path>>(path: P) -> Result<TaskStore, FileError> {
        Ok(TaskStore::with_hierarchy(Self::load(path)?))
    }

    pub fn save<P: AsRef<Path>>(path: P, forest: &[Task]) -> Result<(), FileError> {
        let path = path.as_ref().to_path_buf();
        let content = encode_forest(forest).map_err(|e| FileError::ParseError {
            path: path.clone(),
            reason: e.to_string(),
        })?;

        fs::write(&path, content).map_err(|e| FileError::IoError { path, source: e })
    }
}
