use std::path::PathBuf;

use crate::env_lookup;

pub const DEFAULT_DATA_FILE: &str = "data.json";

/// Location of the persisted registry.
///
/// # Environment Variables
///
/// - `GROUPWISE_DATA_FILE`: Path of the JSON document (default: `data.json`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    pub data_file: PathBuf,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_file = lookup("GROUPWISE_DATA_FILE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());

        Self {
            data_file: PathBuf::from(data_file),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
        }
    }
}
