//! Rules engine.
//!
//! Each feature module exposes a service whose functions validate input
//! against the registry, fail fast on the first violated rule, and only then
//! mutate and commit. A rejected call never leaves a partial change behind.
//!
//! - [`students`]: Student registration, editing, removal, and search
//! - [`groups`]: Group creation, editing, removal, and search
//! - [`membership`]: Adding, removing, and transferring group members

pub mod groups;
pub mod membership;
pub mod students;

use groupwise_core::AppError;
use tracing::warn;

pub use groups::GroupService;
pub use membership::MembershipService;
pub use students::StudentService;

/// Logs a rejected operation. Used with `Result::inspect_err`.
pub(crate) fn log_rejection(err: &AppError) {
    warn!(kind = %err.kind(), reason = %err, "Operation rejected");
}
