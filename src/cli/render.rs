use std::fmt::Write;

use groupwise_models::{Group, Student};

use crate::registry::Registry;

const NO_GROUP: &str = "-";

/// Student listing, one row per student, with the group shown by name.
pub fn student_table<'a>(students: impl IntoIterator<Item = &'a Student>, registry: &Registry) -> String {
    let mut out = format!(
        "{:<12} {:<30} {:<34} {}\n",
        "NUMBER", "NAME", "EMAIL", "GROUP"
    );
    let mut rows = 0;
    for student in students {
        let group = student
            .group_id
            .and_then(|id| registry.group(id))
            .map(|g| g.name.as_str())
            .unwrap_or(NO_GROUP);
        let _ = writeln!(
            out,
            "{:<12} {:<30} {:<34} {}",
            student.student_number, student.name, student.email, group
        );
        rows += 1;
    }
    if rows == 0 {
        out.push_str("(no students)\n");
    }
    out
}

pub fn group_table<'a>(groups: impl IntoIterator<Item = &'a Group>) -> String {
    let mut out = format!(
        "{:<36} {:<24} {:>7} {:>4}\n",
        "ID", "NAME", "SIZE", "MIN"
    );
    let mut rows = 0;
    for group in groups {
        let _ = writeln!(
            out,
            "{:<36} {:<24} {:>7} {:>4}",
            group.group_id.to_string(),
            group.name,
            format!("{}/{}", group.current_size(), group.max_capacity),
            group.min_capacity
        );
        rows += 1;
    }
    if rows == 0 {
        out.push_str("(no groups)\n");
    }
    out
}

pub fn student_detail(student: &Student, registry: &Registry) -> String {
    let group = student
        .group_id
        .and_then(|id| registry.group(id))
        .map(|g| g.to_string())
        .unwrap_or_else(|| "unassigned".to_string());

    format!(
        "{}\n  email:    {}\n  group:    {}\n  created:  {}\n",
        student,
        student.email,
        group,
        student.creation_date.format("%Y-%m-%d %H:%M:%S")
    )
}

pub fn group_detail(group: &Group, members: &[Student]) -> String {
    let mut out = format!(
        "{}\n  id:       {}\n  capacity: {} to {}\n  created:  {}\n  members:\n",
        group,
        group.group_id,
        group.min_capacity,
        group.max_capacity,
        group.creation_date.format("%Y-%m-%d %H:%M:%S")
    );
    if members.is_empty() {
        out.push_str("    (none)\n");
    }
    for member in members {
        let _ = writeln!(out, "    {}", member);
    }
    if group.is_below_minimum() {
        let _ = writeln!(out, "  warning: below minimum size");
    }
    out
}
