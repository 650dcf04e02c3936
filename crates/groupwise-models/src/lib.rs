//! # Groupwise Models
//!
//! Domain models and DTOs for Groupwise.
//!
//! # Modules
//!
//! - [`ids`]: Strongly-typed identifiers
//! - [`students`]: Student entity and request DTOs
//! - [`groups`]: Group entity and request DTOs
//! - [`snapshot`]: The persisted registry document

pub mod groups;
pub mod ids;
pub mod snapshot;
pub mod students;

// Re-export commonly used types at crate root for convenience
pub use groups::{CreateGroupDto, Group, UpdateGroupDto};
pub use ids::GroupId;
pub use snapshot::RegistrySnapshot;
pub use students::{CreateStudentDto, Student, UpdateStudentDto};
