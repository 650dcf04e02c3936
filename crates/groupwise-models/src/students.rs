//! Student domain models and DTOs.

use chrono::{DateTime, Utc};
use groupwise_core::serde::{deserialize_optional_id, deserialize_timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::GroupId;

/// A registered student.
///
/// `student_number` is the primary key. `group_id` is a back-reference by
/// key into the registry; the group's `student_ids` lists this student
/// whenever it is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub student_number: String,
    pub name: String,
    pub email: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub group_id: Option<GroupId>,
    #[serde(default = "Utc::now", deserialize_with = "deserialize_timestamp")]
    pub creation_date: DateTime<Utc>,
}

impl Student {
    /// A new, unassigned student stamped with the current time.
    pub fn new(
        student_number: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            student_number: student_number.into(),
            name: name.into(),
            email: email.into(),
            group_id: None,
            creation_date: Utc::now(),
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.group_id.is_some()
    }

    pub fn is_in(&self, group_id: GroupId) -> bool {
        self.group_id == Some(group_id)
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.student_number)
    }
}

/// DTO for registering a student.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudentDto {
    pub student_number: String,
    pub name: String,
    pub email: String,
}

/// DTO for editing a student. The number and group are not editable here.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStudentDto {
    pub name: String,
    pub email: String,
}
