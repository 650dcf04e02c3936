mod common;

use common::{create_test_group, create_test_student, memory_state};
use groupwise::groupwise_core::ErrorKind;
use groupwise::groupwise_models::{CreateStudentDto, UpdateStudentDto};
use groupwise::modules::{MembershipService, StudentService};

fn dto(number: &str, name: &str, email: &str) -> CreateStudentDto {
    CreateStudentDto {
        student_number: number.to_string(),
        name: name.to_string(),
        email: email.to_string(),
    }
}

#[test]
fn test_create_then_get_returns_same_fields() {
    let (mut state, store) = memory_state();

    StudentService::create_student(&mut state, dto("20240001", "Ana Silva", "ana@my.istec.pt"))
        .unwrap();
    let student = StudentService::get_student(&state, "20240001").unwrap();

    assert_eq!(student.student_number, "20240001");
    assert_eq!(student.name, "Ana Silva");
    assert_eq!(student.email, "ana@my.istec.pt");
    assert_eq!(student.group_id, None);
    assert_eq!(store.last_saved().unwrap().students.len(), 1);
}

#[test]
fn test_duplicate_number_rejected_regardless_of_other_fields() {
    let (mut state, _) = memory_state();
    create_test_student(&mut state, "100");

    for (name, email) in [
        ("Other Name", "other@my.istec.pt"),
        ("", ""),
        ("X1", "x@gmail.com"),
    ] {
        let err = StudentService::create_student(&mut state, dto("100", name, email)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateKey);
    }
    assert_eq!(StudentService::get_all_students(&state).len(), 1);
}

#[test]
fn test_foreign_domain_rejected() {
    let (mut state, store) = memory_state();

    let err = StudentService::create_student(&mut state, dto("100", "Ana Silva", "a@gmail.com"))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidDomain);
    assert!(store.last_saved().is_none());
}

#[test]
fn test_both_institutional_domains_accepted() {
    let (mut state, _) = memory_state();
    StudentService::create_student(&mut state, dto("100", "Ana Silva", "ana@my.istec.pt"))
        .unwrap();
    StudentService::create_student(&mut state, dto("101", "Rui Sousa", "Rui@ISTEC.PT")).unwrap();
}

#[test]
fn test_update_keeps_own_email_and_rejects_taken_one() {
    let (mut state, _) = memory_state();
    create_test_student(&mut state, "100");
    create_test_student(&mut state, "101");

    let updated = StudentService::update_student(
        &mut state,
        "100",
        UpdateStudentDto {
            name: "Renamed Student".to_string(),
            email: "test100@my.istec.pt".to_string(),
        },
    )
    .unwrap();
    assert_eq!(updated.name, "Renamed Student");

    let err = StudentService::update_student(
        &mut state,
        "100",
        UpdateStudentDto {
            name: "Renamed Student".to_string(),
            email: "TEST101@my.istec.pt".to_string(),
        },
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateValue);
}

#[test]
fn test_update_missing_student() {
    let (mut state, _) = memory_state();
    let err = StudentService::update_student(
        &mut state,
        "404",
        UpdateStudentDto {
            name: "Nobody Here".to_string(),
            email: "nobody@my.istec.pt".to_string(),
        },
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_delete_member_ignores_group_minimum() {
    let (mut state, _) = memory_state();
    let group = create_test_group(&mut state, "Alpha", 3, 2);
    create_test_student(&mut state, "100");
    create_test_student(&mut state, "101");
    MembershipService::add_student_to_group(&mut state, "100", group.group_id).unwrap();
    MembershipService::add_student_to_group(&mut state, "101", group.group_id).unwrap();

    StudentService::delete_student(&mut state, "100").unwrap();

    assert_eq!(
        StudentService::get_student(&state, "100").unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(common::member_numbers(&state, group.group_id), vec!["101"]);
}

#[test]
fn test_unassigned_listing() {
    let (mut state, _) = memory_state();
    let group = create_test_group(&mut state, "Alpha", 3, 1);
    create_test_student(&mut state, "100");
    create_test_student(&mut state, "101");
    MembershipService::add_student_to_group(&mut state, "101", group.group_id).unwrap();

    let unassigned = StudentService::get_students_without_group(&state);
    assert_eq!(unassigned.len(), 1);
    assert_eq!(unassigned[0].student_number, "100");
}
