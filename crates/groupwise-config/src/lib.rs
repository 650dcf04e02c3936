//! # Groupwise Config
//!
//! Configuration types for Groupwise.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`storage`]: Where the registry document lives
//! - [`rules`]: Institutional email domains and capacity defaults
//! - [`logging`]: Console filter level and optional JSON log directory
//!
//! # Example
//!
//! ```ignore
//! use groupwise_config::{LogConfig, RulesConfig, StorageConfig};
//!
//! let storage = StorageConfig::from_env();
//! let rules = RulesConfig::from_env();
//! let logging = LogConfig::from_env();
//! ```

pub mod logging;
pub mod rules;
pub mod storage;

// Re-export commonly used types at crate root
pub use logging::LogConfig;
pub use rules::RulesConfig;
pub use storage::StorageConfig;

/// Variable lookup used by the `from_lookup` constructors.
///
/// `from_env` passes `std::env::var`; tests pass a map.
pub(crate) fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
