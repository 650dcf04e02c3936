mod common;

use std::cell::Cell;
use std::fs;
use std::rc::Rc;

use common::{create_test_group, create_test_student, file_state, temp_data_file};
use groupwise::groupwise_core::ErrorKind;
use groupwise::groupwise_models::{GroupId, RegistrySnapshot};
use groupwise::modules::{GroupService, MembershipService, StudentService};
use groupwise::persistence::{JsonFileStore, RegistryStore};

#[test]
fn test_missing_file_starts_empty() {
    let (_dir, path) = temp_data_file();
    let state = file_state(&path);

    assert!(StudentService::get_all_students(&state).is_empty());
    assert!(GroupService::get_all_groups(&state).is_empty());
    assert!(!path.exists());
}

#[test]
fn test_every_mutation_is_written() {
    let (_dir, path) = temp_data_file();
    let mut state = file_state(&path);

    create_test_student(&mut state, "100");
    let on_disk = JsonFileStore::new(&path).load().unwrap().unwrap();
    assert_eq!(on_disk.students.len(), 1);

    let group = create_test_group(&mut state, "Alpha", 3, 1);
    MembershipService::add_student_to_group(&mut state, "100", group.group_id).unwrap();
    let on_disk = JsonFileStore::new(&path).load().unwrap().unwrap();
    assert_eq!(on_disk.groups[0].student_ids, vec!["100"]);
    assert_eq!(on_disk.students[0].group_id, Some(group.group_id));
}

#[test]
fn test_restart_restores_entities_and_membership() {
    let (_dir, path) = temp_data_file();
    let group_id;
    let before: RegistrySnapshot;
    {
        let mut state = file_state(&path);
        let alpha = create_test_group(&mut state, "Alpha", 3, 2);
        create_test_group(&mut state, "Beta", 2, 1);
        for number in ["100", "101", "102"] {
            create_test_student(&mut state, number);
        }
        MembershipService::add_student_to_group(&mut state, "101", alpha.group_id).unwrap();
        MembershipService::add_student_to_group(&mut state, "100", alpha.group_id).unwrap();
        group_id = alpha.group_id;
        before = state.registry().snapshot();
    }

    let state = file_state(&path);
    assert_eq!(state.registry().snapshot(), before);

    let members: Vec<String> = MembershipService::get_group_members(&state, group_id)
        .unwrap()
        .into_iter()
        .map(|s| s.student_number)
        .collect();
    assert_eq!(members, vec!["101", "100"]);
    assert!(!StudentService::get_student(&state, "102").unwrap().is_assigned());
}

#[test]
fn test_malformed_file_loads_empty() {
    let (_dir, path) = temp_data_file();
    fs::write(&path, "{\"students\": [ oops").unwrap();

    let state = file_state(&path);

    assert_eq!(state.registry().student_count(), 0);
    assert_eq!(state.registry().group_count(), 0);
    assert_eq!(fs::read_to_string(&path).unwrap(), "{\"students\": [ oops");
}

#[test]
fn test_legacy_document_is_accepted() {
    let (_dir, path) = temp_data_file();
    let group_id = GroupId::from_u128(0x6b1d_2c3e_4f50_4a6b_8c7d_9e0f_1a2b_3c4d);
    let legacy = format!(
        r#"{{
            "students": [
                {{"student_number": "100", "name": "Ana Silva", "email": "ana@my.istec.pt",
                  "group_id": "{gid}", "creation_date": "2024-03-01 10:15:00"}},
                {{"student_number": "101", "name": "Rui Sousa", "email": "rui@my.istec.pt",
                  "group_id": ""}},
                {{"student_number": "102", "name": "Inês Costa", "email": "ines@istec.pt",
                  "group_id": null, "creation_date": "2024-03-02 09:00:00"}}
            ],
            "groups": [
                {{"group_id": "{gid}", "name": "Alpha", "max_capacity": 3,
                  "creation_date": "2024-03-01 10:00:00", "student_ids": ["100"]}}
            ]
        }}"#,
        gid = group_id
    );
    fs::write(&path, legacy).unwrap();

    let state = file_state(&path);

    let group = GroupService::get_group(&state, group_id).unwrap();
    assert_eq!(group.min_capacity, 2);
    assert_eq!(group.student_ids, vec!["100"]);
    assert!(StudentService::get_student(&state, "100").unwrap().is_in(group_id));
    assert!(!StudentService::get_student(&state, "101").unwrap().is_assigned());
    assert_eq!(
        StudentService::get_student(&state, "102")
            .unwrap()
            .creation_date
            .to_rfc3339(),
        "2024-03-02T09:00:00+00:00"
    );
}

#[test]
fn test_load_repairs_one_sided_references() {
    let (_dir, path) = temp_data_file();
    let group_id = GroupId::from_u128(7);
    let document = format!(
        r#"{{
            "students": [
                {{"student_number": "100", "name": "Ana Silva", "email": "ana@my.istec.pt",
                  "group_id": null}},
                {{"student_number": "101", "name": "Rui Sousa", "email": "rui@my.istec.pt",
                  "group_id": "{gid}"}}
            ],
            "groups": [
                {{"group_id": "{gid}", "name": "Alpha", "max_capacity": 3, "min_capacity": 1,
                  "student_ids": ["100", "999"]}}
            ]
        }}"#,
        gid = group_id
    );
    fs::write(&path, document).unwrap();

    let state = file_state(&path);

    assert_eq!(state.registry().group(group_id).unwrap().student_ids, vec!["100"]);
    assert!(StudentService::get_student(&state, "100").unwrap().is_in(group_id));
    assert!(!StudentService::get_student(&state, "101").unwrap().is_assigned());
}

#[test]
fn test_non_ascii_text_survives_restart() {
    let (_dir, path) = temp_data_file();
    {
        let mut state = file_state(&path);
        StudentService::create_student(
            &mut state,
            groupwise::groupwise_models::CreateStudentDto {
                student_number: "100".to_string(),
                name: "João Conceição".to_string(),
                email: "joao@my.istec.pt".to_string(),
            },
        )
        .unwrap();
    }

    let state = file_state(&path);
    assert_eq!(
        StudentService::get_student(&state, "100").unwrap().name,
        "João Conceição"
    );
    assert!(fs::read_to_string(&path).unwrap().contains("João Conceição"));
}

#[test]
fn test_failed_write_keeps_change_and_notifies() {
    let (dir, _) = temp_data_file();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();
    let path = blocker.join("data.json");

    let mut state = file_state(&path);
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    state.subscribe(move |_| counter.set(counter.get() + 1));

    create_test_student(&mut state, "100");

    assert_eq!(state.registry().student_count(), 1);
    assert!(StudentService::get_student(&state, "100").is_ok());
    assert_eq!(calls.get(), 1);
    assert!(!path.exists());
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "not a directory");
}

#[test]
fn test_rejected_removal_writes_nothing() {
    let (_dir, path) = temp_data_file();
    let mut state = file_state(&path);
    let group = create_test_group(&mut state, "Alpha", 3, 1);
    let before = fs::read_to_string(&path).unwrap();

    let err = MembershipService::remove_student_from_group(&mut state, "404", group.group_id)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}
