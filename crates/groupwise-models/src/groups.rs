//! Group domain models and DTOs.

use chrono::{DateTime, Utc};
use groupwise_core::serde::deserialize_timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::GroupId;

/// Minimum group size assumed for records written before the field existed.
pub const LEGACY_MIN_CAPACITY: u32 = 2;

fn legacy_min_capacity() -> u32 {
    LEGACY_MIN_CAPACITY
}

/// A work group.
///
/// Members are held as student numbers in insertion order, never as owned
/// students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub group_id: GroupId,
    pub name: String,
    pub max_capacity: u32,
    #[serde(default = "legacy_min_capacity")]
    pub min_capacity: u32,
    #[serde(default = "Utc::now", deserialize_with = "deserialize_timestamp")]
    pub creation_date: DateTime<Utc>,
    #[serde(default)]
    pub student_ids: Vec<String>,
}

impl Group {
    /// A new, empty group with a fresh identifier.
    pub fn new(name: impl Into<String>, max_capacity: u32, min_capacity: u32) -> Self {
        Self {
            group_id: GroupId::new(),
            name: name.into(),
            max_capacity,
            min_capacity,
            creation_date: Utc::now(),
            student_ids: Vec::new(),
        }
    }

    pub fn current_size(&self) -> usize {
        self.student_ids.len()
    }

    pub fn has_vacancy(&self) -> bool {
        self.current_size() < self.max_capacity as usize
    }

    pub fn contains(&self, student_number: &str) -> bool {
        self.student_ids.iter().any(|s| s == student_number)
    }

    /// Whether taking one member out would leave fewer than `min_capacity`.
    pub fn removal_breaches_minimum(&self) -> bool {
        self.current_size().saturating_sub(1) < self.min_capacity as usize
    }

    pub fn is_below_minimum(&self) -> bool {
        self.current_size() < self.min_capacity as usize
    }

    /// Appends a member. Returns `false` if already listed.
    pub fn add_student(&mut self, student_number: &str) -> bool {
        if self.contains(student_number) {
            return false;
        }
        self.student_ids.push(student_number.to_string());
        true
    }

    /// Removes a member. Returns `false` if not listed.
    pub fn remove_student(&mut self, student_number: &str) -> bool {
        let before = self.student_ids.len();
        self.student_ids.retain(|s| s != student_number);
        self.student_ids.len() != before
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}/{})",
            self.name,
            self.current_size(),
            self.max_capacity
        )
    }
}

/// DTO for creating a group. `min_capacity` falls back to the configured default.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroupDto {
    pub name: String,
    pub max_capacity: i64,
    pub min_capacity: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGroupDto {
    pub name: String,
    pub max_capacity: i64,
    pub min_capacity: i64,
}
