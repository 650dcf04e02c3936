use anyhow::anyhow;
use groupwise_core::AppError;
use groupwise_models::{Group, GroupId, Student};
use tracing::{info, instrument};

use crate::events::RegistryEvent;
use crate::modules::log_rejection;
use crate::state::AppState;

/// Moves students in and out of groups.
///
/// A student is either unassigned or assigned to exactly one group. Adding
/// never transfers implicitly. A transfer checks both ends before touching
/// either.
pub struct MembershipService;

impl MembershipService {
    #[instrument(skip(state))]
    pub fn add_student_to_group(
        state: &mut AppState,
        student_number: &str,
        group_id: GroupId,
    ) -> Result<(), AppError> {
        Self::check_add(state, student_number, group_id).inspect_err(log_rejection)?;

        state.registry.link(student_number, group_id);
        state.commit(RegistryEvent::StudentAssigned {
            student_number: student_number.to_string(),
            group_id,
        });

        info!("Student added to group");
        Ok(())
    }

    #[instrument(skip(state))]
    pub fn remove_student_from_group(
        state: &mut AppState,
        student_number: &str,
        group_id: GroupId,
    ) -> Result<(), AppError> {
        Self::check_remove(state, student_number, group_id).inspect_err(log_rejection)?;

        state.registry.unlink(student_number, group_id);
        state.commit(RegistryEvent::StudentUnassigned {
            student_number: student_number.to_string(),
            group_id,
        });

        info!("Student removed from group");
        Ok(())
    }

    /// Reassigns a student to `new_group_id`, from its current group if any.
    ///
    /// All checks run before any change, so a refused transfer leaves both
    /// groups exactly as they were. The result is persisted once.
    #[instrument(skip(state))]
    pub fn transfer_student(
        state: &mut AppState,
        student_number: &str,
        new_group_id: GroupId,
    ) -> Result<(), AppError> {
        let from = Self::check_transfer(state, student_number, new_group_id)
            .inspect_err(log_rejection)?;

        if let Some(source) = from {
            state.registry.unlink(student_number, source);
        }
        state.registry.link(student_number, new_group_id);

        state.commit(RegistryEvent::StudentTransferred {
            student_number: student_number.to_string(),
            from,
            to: new_group_id,
        });

        info!(from = ?from, "Student transferred");
        Ok(())
    }

    /// Members of a group in the order they joined.
    pub fn get_group_members(state: &AppState, group_id: GroupId) -> Result<Vec<Student>, AppError> {
        let group = find_group(state, group_id)?;
        Ok(group
            .student_ids
            .iter()
            .filter_map(|number| state.registry.student(number))
            .cloned()
            .collect())
    }

    fn check_add(state: &AppState, student_number: &str, group_id: GroupId) -> Result<(), AppError> {
        let student = find_student(state, student_number)?;
        let group = find_group(state, group_id)?;

        if let Some(current) = student.group_id {
            return Err(AppError::already_assigned(anyhow!(
                "Student {} already belongs to group {}",
                student_number,
                current
            )));
        }

        if !group.has_vacancy() {
            return Err(group_full(group));
        }

        Ok(())
    }

    fn check_remove(
        state: &AppState,
        student_number: &str,
        group_id: GroupId,
    ) -> Result<(), AppError> {
        find_student(state, student_number)?;
        let group = find_group(state, group_id)?;

        if !group.contains(student_number) {
            return Err(AppError::not_a_member(anyhow!(
                "Student {} is not a member of {}",
                student_number,
                group.name
            )));
        }

        if group.removal_breaches_minimum() {
            return Err(below_minimum(group));
        }

        Ok(())
    }

    /// Returns the source group, if the student has one.
    fn check_transfer(
        state: &AppState,
        student_number: &str,
        new_group_id: GroupId,
    ) -> Result<Option<GroupId>, AppError> {
        let student = find_student(state, student_number)?;
        let destination = find_group(state, new_group_id)?;

        if student.is_in(new_group_id) {
            return Err(AppError::no_op(anyhow!(
                "Student {} is already in {}",
                student_number,
                destination.name
            )));
        }

        if !destination.has_vacancy() {
            return Err(group_full(destination));
        }

        let Some(source_id) = student.group_id else {
            return Ok(None);
        };

        // A dangling source reference would have been cleared on load; treat
        // it as unassigned if one slips through.
        if let Some(source) = state.registry.group(source_id)
            && source.removal_breaches_minimum()
        {
            return Err(below_minimum(source));
        }

        Ok(Some(source_id))
    }
}

fn find_student<'a>(state: &'a AppState, student_number: &str) -> Result<&'a Student, AppError> {
    state
        .registry
        .student(student_number)
        .ok_or_else(|| AppError::not_found(anyhow!("Student {} not found", student_number)))
}

fn find_group(state: &AppState, group_id: GroupId) -> Result<&Group, AppError> {
    state
        .registry
        .group(group_id)
        .ok_or_else(|| AppError::not_found(anyhow!("Group {} not found", group_id)))
}

fn group_full(group: &Group) -> AppError {
    AppError::group_full(anyhow!(
        "Group {} is full ({} of {})",
        group.name,
        group.current_size(),
        group.max_capacity
    ))
}

fn below_minimum(group: &Group) -> AppError {
    AppError::below_minimum(anyhow!(
        "Group {} cannot drop below {} members",
        group.name,
        group.min_capacity
    ))
}
