//! Terminal presentation.
//!
//! Formatting and argument resolution for the `groupwise` binary. The rules
//! live in [`crate::modules`]; nothing here mutates the registry directly.

pub mod render;
pub mod seeder;

use std::str::FromStr;

use anyhow::anyhow;
use groupwise_core::AppError;
use groupwise_core::text::eq_ignore_case;
use groupwise_models::GroupId;

use crate::state::AppState;

/// Resolves a group given on the command line either by id or by name
/// (ignoring case).
pub fn resolve_group(state: &AppState, reference: &str) -> Result<GroupId, AppError> {
    let reference = reference.trim();
    if let Ok(id) = GroupId::from_str(reference)
        && state.registry.contains_group(id)
    {
        return Ok(id);
    }

    state
        .registry
        .groups()
        .find(|g| eq_ignore_case(&g.name, reference))
        .map(|g| g.group_id)
        .ok_or_else(|| AppError::not_found(anyhow!("No group matches '{}'", reference)))
}
