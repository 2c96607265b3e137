//! Storage configuration

use std::path::{Path, PathBuf};

/// Location of the snapshot file, relative to the working directory.
pub const DEFAULT_STORAGE_FILE: &str = "data/capability-submissions.json";

/// Environment variable overriding [`DEFAULT_STORAGE_FILE`].
pub const STORAGE_FILE_ENV: &str = "CAPABILITY_SUBMISSIONS_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub storage_file: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_file: PathBuf::from(DEFAULT_STORAGE_FILE),
        }
    }
}

impl StoreConfig {
    /// Build from `CAPABILITY_SUBMISSIONS_FILE`, falling back to the default path
    pub fn from_env() -> Self {
        match std::env::var(STORAGE_FILE_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::with_storage_file(path),
            _ => Self::default(),
        }
    }

    pub fn with_storage_file(path: impl Into<PathBuf>) -> Self {
        Self {
            storage_file: path.into(),
        }
    }

    /// Directory holding the storage file, if the path has one
    pub fn storage_dir(&self) -> Option<&Path> {
        self.storage_file
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
    }
}
