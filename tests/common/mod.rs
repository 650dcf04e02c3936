use std::path::{Path, PathBuf};

use groupwise::groupwise_config::RulesConfig;
use groupwise::groupwise_models::{CreateGroupDto, CreateStudentDto, Group, GroupId, Student};
use groupwise::modules::{GroupService, StudentService};
use groupwise::persistence::{JsonFileStore, MemoryStore};
use groupwise::state::AppState;
use tempfile::TempDir;

/// Engine over an in-memory store that tests can inspect.
#[allow(dead_code)]
pub fn memory_state() -> (AppState, MemoryStore) {
    let store = MemoryStore::new();
    let state = AppState::new(Box::new(store.clone()), RulesConfig::default());
    (state, store)
}

/// A data file path inside a fresh temporary directory. Keep the `TempDir`
/// alive for the duration of the test.
#[allow(dead_code)]
pub fn temp_data_file() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.json");
    (dir, path)
}

#[allow(dead_code)]
pub fn file_state(path: &Path) -> AppState {
    AppState::new(Box::new(JsonFileStore::new(path)), RulesConfig::default())
}

#[allow(dead_code)]
pub fn create_test_student(state: &mut AppState, number: &str) -> Student {
    StudentService::create_student(
        state,
        CreateStudentDto {
            student_number: number.to_string(),
            name: "Test Student".to_string(),
            email: format!("test{}@my.istec.pt", number),
        },
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn create_test_group(state: &mut AppState, name: &str, max: i64, min: i64) -> Group {
    GroupService::create_group(
        state,
        CreateGroupDto {
            name: name.to_string(),
            max_capacity: max,
            min_capacity: Some(min),
        },
    )
    .unwrap()
}

#[allow(dead_code)]
pub fn member_numbers(state: &AppState, group_id: GroupId) -> Vec<String> {
    state.registry().group(group_id).unwrap().student_ids.clone()
}
