//! Business-rule parameters.
//!
//! The accepted institutional email domains and the default minimum group
//! size are deployment settings rather than code constants.

use crate::env_lookup;

pub const DEFAULT_EMAIL_DOMAINS: &[&str] = &["my.istec.pt", "istec.pt"];
pub const DEFAULT_MIN_CAPACITY: i64 = 2;

/// Rule parameters loaded from environment variables.
///
/// # Environment Variables
///
/// - `GROUPWISE_EMAIL_DOMAINS`: Comma-separated accepted email domains (default: `my.istec.pt,istec.pt`)
/// - `GROUPWISE_DEFAULT_MIN_CAPACITY`: Minimum group size used when none is given (default: `2`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RulesConfig {
    /// Accepted domains, lower-cased, without a leading `@`.
    pub email_domains: Vec<String>,
    pub default_min_capacity: i64,
}

impl RulesConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let email_domains: Vec<String> = lookup("GROUPWISE_EMAIL_DOMAINS")
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().trim_start_matches('@').to_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .filter(|domains: &Vec<String>| !domains.is_empty())
            .unwrap_or_else(default_domains);

        let default_min_capacity = lookup("GROUPWISE_DEFAULT_MIN_CAPACITY")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_MIN_CAPACITY);

        Self {
            email_domains,
            default_min_capacity,
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            email_domains: default_domains(),
            default_min_capacity: DEFAULT_MIN_CAPACITY,
        }
    }
}

fn default_domains() -> Vec<String> {
    DEFAULT_EMAIL_DOMAINS.iter().map(|s| s.to_string()).collect()
}
