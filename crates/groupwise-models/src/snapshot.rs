//! The persisted registry document.

use serde::{Deserialize, Serialize};

use crate::groups::Group;
use crate::students::Student;

/// Full-state document written after every successful mutation.
///
/// ```json
/// { "students": [ ... ], "groups": [ ... ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl RegistrySnapshot {
    pub fn is_empty(&self) -> bool {
        self.students.is_empty() && self.groups.is_empty()
    }
}
