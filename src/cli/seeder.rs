//! Fills the registry with fake students and groups.
//!
//! Everything goes through the services, so seeded data obeys the same rules
//! as data entered by hand. Students are spread round-robin over the groups
//! created in the same run; those that do not fit stay unassigned.

use std::time::Instant;

use fake::Fake;
use fake::faker::address::en::CityName;
use fake::faker::name::en::{FirstName, LastName};
use groupwise_core::ErrorKind;
use groupwise_models::{CreateGroupDto, CreateStudentDto, GroupId};
use tracing::{info, warn};

use crate::modules::{GroupService, MembershipService, StudentService};
use crate::state::AppState;

/// First student number handed out to an empty registry.
pub const FIRST_STUDENT_NUMBER: u64 = 20_240_001;

/// Attempts per entity before giving up on a name or number clash.
const MAX_ATTEMPTS: usize = 16;

#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub groups: usize,
    pub students: usize,
    pub max_capacity: i64,
    /// Falls back to the configured default when `None`.
    pub min_capacity: Option<i64>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            groups: 3,
            students: 10,
            max_capacity: 4,
            min_capacity: None,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub groups_created: usize,
    pub students_created: usize,
    pub students_assigned: usize,
    pub skipped: usize,
}

pub fn seed(state: &mut AppState, config: &SeedConfig) -> SeedReport {
    let start = Instant::now();
    let mut report = SeedReport::default();

    let group_ids = seed_groups(state, config, &mut report);
    let numbers = seed_students(state, config.students, &mut report);

    if !group_ids.is_empty() {
        for (idx, number) in numbers.iter().enumerate() {
            if assign_round_robin(state, number, &group_ids, idx) {
                report.students_assigned += 1;
            }
        }
    }

    info!(
        groups = report.groups_created,
        students = report.students_created,
        assigned = report.students_assigned,
        skipped = report.skipped,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Seeding finished"
    );
    report
}

fn seed_groups(state: &mut AppState, config: &SeedConfig, report: &mut SeedReport) -> Vec<GroupId> {
    let mut ids = Vec::with_capacity(config.groups);
    let mut suffix = state.registry.group_count() + 1;

    for _ in 0..config.groups {
        let mut created = None;
        for _ in 0..MAX_ATTEMPTS {
            let dto = CreateGroupDto {
                name: group_name(suffix),
                max_capacity: config.max_capacity,
                min_capacity: config.min_capacity,
            };
            suffix += 1;

            match GroupService::create_group(state, dto) {
                Ok(group) => {
                    created = Some(group.group_id);
                    break;
                }
                Err(e) if e.kind() == ErrorKind::DuplicateValue => continue,
                Err(e) => {
                    warn!(error = %e, "Seed group rejected");
                    break;
                }
            }
        }

        match created {
            Some(id) => {
                ids.push(id);
                report.groups_created += 1;
            }
            None => report.skipped += 1,
        }
    }

    ids
}

fn seed_students(state: &mut AppState, count: usize, report: &mut SeedReport) -> Vec<String> {
    let mut numbers = Vec::with_capacity(count);
    let mut next = next_student_number(state);
    let Some(domain) = state.rules.email_domains.first().cloned() else {
        warn!("No institutional email domain configured, skipping students");
        report.skipped += count;
        return numbers;
    };

    for _ in 0..count {
        let mut created = None;
        for _ in 0..MAX_ATTEMPTS {
            let number = next.to_string();
            next += 1;

            let first: String = FirstName().fake();
            let last: String = LastName().fake();
            let dto = CreateStudentDto {
                email: format!("{}@{}", email_local_part(&first, &last, &number), domain),
                name: format!("{} {}", first, last),
                student_number: number,
            };

            match StudentService::create_student(state, dto) {
                Ok(student) => {
                    created = Some(student.student_number);
                    break;
                }
                Err(e) if matches!(e.kind(), ErrorKind::DuplicateKey | ErrorKind::DuplicateValue) => {
                    continue;
                }
                Err(e) => {
                    warn!(error = %e, "Seed student rejected");
                    break;
                }
            }
        }

        match created {
            Some(number) => {
                numbers.push(number);
                report.students_created += 1;
            }
            None => report.skipped += 1,
        }
    }

    numbers
}

/// Tries the group at `idx` modulo the group count first, then the rest in
/// order, and stops at the first with room.
fn assign_round_robin(state: &mut AppState, number: &str, group_ids: &[GroupId], idx: usize) -> bool {
    let len = group_ids.len();
    for offset in 0..len {
        let group_id = group_ids[(idx + offset) % len];
        let has_room = state
            .registry
            .group(group_id)
            .is_some_and(|g| g.has_vacancy());
        if has_room {
            return MembershipService::add_student_to_group(state, number, group_id).is_ok();
        }
    }
    false
}

/// One past the highest all-digit number on record.
fn next_student_number(state: &AppState) -> u64 {
    state
        .registry
        .students()
        .filter_map(|s| s.student_number.parse::<u64>().ok())
        .max()
        .map(|n| n.saturating_add(1))
        .unwrap_or(FIRST_STUDENT_NUMBER)
}

fn group_name(suffix: usize) -> String {
    let city: String = CityName().fake();
    let city = ascii_words(&city);
    if city.is_empty() {
        format!("Team {}", suffix)
    } else {
        format!("{} {}", city, suffix)
    }
}

fn email_local_part(first: &str, last: &str, number: &str) -> String {
    let first = ascii_alnum(first);
    let last = ascii_alnum(last);
    match (first.is_empty(), last.is_empty()) {
        (false, false) => format!("{}.{}{}", first, last, number),
        (false, true) => format!("{}{}", first, number),
        (true, false) => format!("{}{}", last, number),
        (true, true) => format!("s{}", number),
    }
}

fn ascii_alnum(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn ascii_words(s: &str) -> String {
    s.split_whitespace()
        .map(|word| word.chars().filter(char::is_ascii_alphanumeric).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
