use std::path::PathBuf;

use crate::env_lookup;

/// Logging configuration.
///
/// # Environment Variables
///
/// - `LOG_LEVEL`: Console level used when `RUST_LOG` is unset (default: `info`)
/// - `LOG_DIR`: Directory for daily-rolling JSON logs (default: unset, file logging off)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogConfig {
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            log_level: lookup("LOG_LEVEL")
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "info".to_string()),
            log_dir: lookup("LOG_DIR")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .map(PathBuf::from),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}
