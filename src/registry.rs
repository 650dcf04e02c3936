//! In-memory store of all students and groups.
//!
//! The registry is the sole owner of every entity. Students point at their
//! group by [`GroupId`] and groups list their members by student number, so
//! there are no owning cross-references. `Registry::link` and
//! `Registry::unlink` update both sides together.

use std::collections::HashMap;

use groupwise_models::{Group, GroupId, RegistrySnapshot, Student};
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct Registry {
    students: HashMap<String, Student>,
    student_order: Vec<String>,
    groups: HashMap<GroupId, Group>,
    group_order: Vec<GroupId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from a persisted document.
    ///
    /// Records repeating an already-seen key are skipped. Call
    /// [`Registry::reconcile`] afterwards to repair dangling references.
    pub fn from_snapshot(snapshot: RegistrySnapshot) -> Self {
        let mut registry = Self::new();

        for student in snapshot.students {
            if registry.contains_student(&student.student_number) {
                warn!(
                    student_number = %student.student_number,
                    "Skipping duplicate student record"
                );
                continue;
            }
            registry.insert_student(student);
        }

        for group in snapshot.groups {
            if registry.contains_group(group.group_id) {
                warn!(group_id = %group.group_id, "Skipping duplicate group record");
                continue;
            }
            registry.insert_group(group);
        }

        registry
    }

    /// Full-state document in listing order.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            students: self.students().cloned().collect(),
            groups: self.groups().cloned().collect(),
        }
    }

    pub fn student(&self, student_number: &str) -> Option<&Student> {
        self.students.get(student_number)
    }

    pub(crate) fn student_mut(&mut self, student_number: &str) -> Option<&mut Student> {
        self.students.get_mut(student_number)
    }

    pub fn contains_student(&self, student_number: &str) -> bool {
        self.students.contains_key(student_number)
    }

    /// Students in insertion order.
    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.student_order
            .iter()
            .filter_map(|number| self.students.get(number))
    }

    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    /// Inserts or replaces a student, keeping its original listing position
    /// on replace.
    pub(crate) fn insert_student(&mut self, student: Student) {
        let key = student.student_number.clone();
        if self.students.insert(key.clone(), student).is_none() {
            self.student_order.push(key);
        }
    }

    pub(crate) fn remove_student(&mut self, student_number: &str) -> Option<Student> {
        let removed = self.students.remove(student_number)?;
        self.student_order.retain(|n| n != student_number);
        Some(removed)
    }

    pub fn group(&self, group_id: GroupId) -> Option<&Group> {
        self.groups.get(&group_id)
    }

    pub(crate) fn group_mut(&mut self, group_id: GroupId) -> Option<&mut Group> {
        self.groups.get_mut(&group_id)
    }

    pub fn contains_group(&self, group_id: GroupId) -> bool {
        self.groups.contains_key(&group_id)
    }

    /// Groups in insertion order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.group_order.iter().filter_map(|id| self.groups.get(id))
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub(crate) fn insert_group(&mut self, group: Group) {
        let key = group.group_id;
        if self.groups.insert(key, group).is_none() {
            self.group_order.push(key);
        }
    }

    pub(crate) fn remove_group(&mut self, group_id: GroupId) -> Option<Group> {
        let removed = self.groups.remove(&group_id)?;
        self.group_order.retain(|id| *id != group_id);
        Some(removed)
    }

    /// Appends `student_number` to the group and points the student at it.
    ///
    /// Returns `false` without touching anything when either side is missing.
    pub(crate) fn link(&mut self, student_number: &str, group_id: GroupId) -> bool {
        let (Some(student), Some(group)) = (
            self.students.get_mut(student_number),
            self.groups.get_mut(&group_id),
        ) else {
            return false;
        };

        group.add_student(student_number);
        student.group_id = Some(group_id);
        true
    }

    /// Drops `student_number` from the group and clears the student's
    /// reference if it pointed there.
    pub(crate) fn unlink(&mut self, student_number: &str, group_id: GroupId) {
        if let Some(group) = self.groups.get_mut(&group_id) {
            group.remove_student(student_number);
        }
        if let Some(student) = self.students.get_mut(student_number)
            && student.group_id == Some(group_id)
        {
            student.group_id = None;
        }
    }

    /// Restores bidirectional consistency between students and groups.
    ///
    /// - member entries whose student is missing, duplicated, or assigned
    ///   elsewhere are dropped
    /// - an unassigned student listed by a group is pointed at that group
    /// - a student pointing at a missing group, or at a group that does not
    ///   list it, becomes unassigned
    ///
    /// Groups below their minimum are reported but not changed. Returns the
    /// number of repairs made.
    pub(crate) fn reconcile(&mut self) -> usize {
        let mut repairs = 0;

        for group_id in self.group_order.clone() {
            let Some(group) = self.groups.get_mut(&group_id) else {
                continue;
            };

            let mut kept: Vec<String> = Vec::with_capacity(group.student_ids.len());
            for number in std::mem::take(&mut group.student_ids) {
                if kept.contains(&number) {
                    warn!(group_id = %group_id, student_number = %number, "Dropping repeated member entry");
                    repairs += 1;
                    continue;
                }

                match self.students.get_mut(&number) {
                    None => {
                        warn!(group_id = %group_id, student_number = %number, "Dropping member with no student record");
                        repairs += 1;
                    }
                    Some(student) => match student.group_id {
                        Some(current) if current == group_id => kept.push(number),
                        Some(other) => {
                            warn!(
                                group_id = %group_id,
                                student_number = %number,
                                assigned_to = %other,
                                "Dropping member assigned to another group"
                            );
                            repairs += 1;
                        }
                        None => {
                            warn!(group_id = %group_id, student_number = %number, "Relinking member with empty group reference");
                            student.group_id = Some(group_id);
                            kept.push(number);
                            repairs += 1;
                        }
                    },
                }
            }
            group.student_ids = kept;
        }

        for number in &self.student_order {
            let Some(student) = self.students.get_mut(number) else {
                continue;
            };
            let Some(group_id) = student.group_id else {
                continue;
            };

            let listed = self
                .groups
                .get(&group_id)
                .is_some_and(|group| group.contains(number));
            if !listed {
                warn!(
                    student_number = %number,
                    group_id = %group_id,
                    "Clearing reference to a group that does not list the student"
                );
                student.group_id = None;
                repairs += 1;
            }
        }

        for group in self.groups() {
            if group.is_below_minimum() {
                warn!(
                    group_id = %group.group_id,
                    size = group.current_size(),
                    min_capacity = group.min_capacity,
                    "Group is below its minimum size"
                );
            }
        }

        repairs
    }
}
