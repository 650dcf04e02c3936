use anyhow::anyhow;
use groupwise_core::AppError;
use groupwise_core::text::{eq_ignore_case, fold, is_alphanumeric_with_spaces};
use groupwise_models::{CreateGroupDto, Group, GroupId, UpdateGroupDto};
use tracing::{info, instrument};

use crate::events::RegistryEvent;
use crate::modules::log_rejection;
use crate::state::AppState;

pub struct GroupService;

impl GroupService {
    /// Creates an empty group.
    ///
    /// Checks, in order: name characters, name uniqueness (ignoring case),
    /// positive capacities, `min_capacity <= max_capacity`. A missing
    /// `min_capacity` takes the configured default.
    #[instrument(skip(state, dto), fields(name = %dto.name))]
    pub fn create_group(state: &mut AppState, dto: CreateGroupDto) -> Result<Group, AppError> {
        let name = dto.name.trim();
        let min_capacity = dto
            .min_capacity
            .unwrap_or(state.rules.default_min_capacity);

        let (max_capacity, min_capacity) =
            Self::validate(state, name, dto.max_capacity, min_capacity, None)
                .inspect_err(log_rejection)?;

        let group = Group::new(name, max_capacity, min_capacity);
        state.registry.insert_group(group.clone());
        state.commit(RegistryEvent::GroupCreated {
            group_id: group.group_id,
        });

        info!(group_id = %group.group_id, max_capacity, min_capacity, "Group created");
        Ok(group)
    }

    /// Renames a group and changes its capacities.
    ///
    /// Besides the creation checks, the new maximum may not be below the
    /// current membership.
    #[instrument(skip(state, dto))]
    pub fn update_group(
        state: &mut AppState,
        group_id: GroupId,
        dto: UpdateGroupDto,
    ) -> Result<Group, AppError> {
        let name = dto.name.trim();

        let Some(current_size) = state.registry.group(group_id).map(Group::current_size) else {
            let err = AppError::not_found(anyhow!("Group {} not found", group_id));
            log_rejection(&err);
            return Err(err);
        };

        let (max_capacity, min_capacity) =
            Self::validate(state, name, dto.max_capacity, dto.min_capacity, Some(group_id))
                .and_then(|caps| {
                    if (caps.0 as usize) < current_size {
                        return Err(AppError::capacity_below_occupancy(anyhow!(
                            "Maximum capacity {} is below the current {} members",
                            caps.0,
                            current_size
                        )));
                    }
                    Ok(caps)
                })
                .inspect_err(log_rejection)?;

        let Some(group) = state.registry.group_mut(group_id) else {
            return Err(AppError::not_found(anyhow!("Group {} not found", group_id)));
        };
        group.name = name.to_string();
        group.max_capacity = max_capacity;
        group.min_capacity = min_capacity;
        let updated = group.clone();

        state.commit(RegistryEvent::GroupUpdated { group_id });

        info!(max_capacity, min_capacity, "Group updated");
        Ok(updated)
    }

    /// Removes a group and unassigns every member.
    ///
    /// The minimum size does not apply: the group ceases to exist.
    #[instrument(skip(state))]
    pub fn delete_group(state: &mut AppState, group_id: GroupId) -> Result<(), AppError> {
        let Some(group) = state.registry.remove_group(group_id) else {
            let err = AppError::not_found(anyhow!("Group {} not found", group_id));
            log_rejection(&err);
            return Err(err);
        };

        for number in &group.student_ids {
            if let Some(student) = state.registry.student_mut(number)
                && student.group_id == Some(group_id)
            {
                student.group_id = None;
            }
        }

        state.commit(RegistryEvent::GroupDeleted { group_id });

        info!(released = group.student_ids.len(), "Group deleted");
        Ok(())
    }

    pub fn get_group(state: &AppState, group_id: GroupId) -> Result<Group, AppError> {
        state
            .registry
            .group(group_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(anyhow!("Group {} not found", group_id)))
    }

    pub fn get_all_groups(state: &AppState) -> Vec<Group> {
        state.registry.groups().cloned().collect()
    }

    /// Groups whose name contains `query`, ignoring case and accents. A blank
    /// query returns every group.
    #[instrument(skip(state))]
    pub fn search_groups(state: &AppState, query: &str) -> Vec<Group> {
        let needle = fold(query.trim());
        state
            .registry
            .groups()
            .filter(|g| needle.is_empty() || fold(&g.name).contains(&needle))
            .cloned()
            .collect()
    }

    /// Returns `(max_capacity, min_capacity)` once every check passes.
    fn validate(
        state: &AppState,
        name: &str,
        max_capacity: i64,
        min_capacity: i64,
        exclude: Option<GroupId>,
    ) -> Result<(u32, u32), AppError> {
        if !is_alphanumeric_with_spaces(name) {
            return Err(AppError::invalid_format(anyhow!(
                "Group name may only contain letters, digits, and spaces"
            )));
        }

        let taken = state
            .registry
            .groups()
            .filter(|g| Some(g.group_id) != exclude)
            .any(|g| eq_ignore_case(&g.name, name));
        if taken {
            return Err(AppError::duplicate_value(anyhow!(
                "A group named {} already exists",
                name
            )));
        }

        let max_capacity = positive_capacity(max_capacity, "Maximum capacity")?;
        let min_capacity = positive_capacity(min_capacity, "Minimum capacity")?;

        if min_capacity > max_capacity {
            return Err(AppError::invalid_range(anyhow!(
                "Minimum capacity {} exceeds maximum capacity {}",
                min_capacity,
                max_capacity
            )));
        }

        Ok((max_capacity, min_capacity))
    }
}

fn positive_capacity(value: i64, label: &str) -> Result<u32, AppError> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| AppError::invalid_format(anyhow!("{} must be a positive integer", label)))
}

/// Parses free-text capacity input, as typed into a form.
pub fn parse_capacity(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::invalid_format(anyhow!("Capacity must be an integer")))
}
