use anyhow::anyhow;
use groupwise_core::AppError;
use groupwise_core::text::{
    char_len, contains_digit, eq_ignore_case, fold, has_accepted_domain, is_all_digits,
    is_valid_email_shape,
};
use groupwise_models::{CreateStudentDto, Student, UpdateStudentDto};
use tracing::{info, instrument};

use crate::events::RegistryEvent;
use crate::modules::log_rejection;
use crate::state::AppState;

pub const MIN_NAME_LENGTH: usize = 3;

pub struct StudentService;

impl StudentService {
    /// Registers a new, unassigned student.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// number format, number uniqueness, required fields, email domain,
    /// email shape, email uniqueness, name length, digits in name.
    #[instrument(skip(state, dto), fields(student_number = %dto.student_number))]
    pub fn create_student(state: &mut AppState, dto: CreateStudentDto) -> Result<Student, AppError> {
        let number = dto.student_number.trim();
        let name = dto.name.trim();
        let email = dto.email.trim();

        Self::validate_new(state, number, name, email).inspect_err(log_rejection)?;

        let student = Student::new(number, name, email);
        state.registry.insert_student(student.clone());
        state.commit(RegistryEvent::StudentCreated {
            student_number: student.student_number.clone(),
        });

        info!(student_number = %student.student_number, "Student created");
        Ok(student)
    }

    /// Changes a student's name and email. Number, group, and creation date
    /// are left as they are.
    #[instrument(skip(state, dto))]
    pub fn update_student(
        state: &mut AppState,
        student_number: &str,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let student_number = student_number.trim();
        let name = dto.name.trim();
        let email = dto.email.trim();

        if !state.registry.contains_student(student_number) {
            let err = AppError::not_found(anyhow!("Student {} not found", student_number));
            log_rejection(&err);
            return Err(err);
        }
        Self::validate_profile(state, student_number, name, email, Some(student_number))
            .inspect_err(log_rejection)?;

        let Some(student) = state.registry.student_mut(student_number) else {
            return Err(AppError::not_found(anyhow!(
                "Student {} not found",
                student_number
            )));
        };
        student.name = name.to_string();
        student.email = email.to_string();
        let updated = student.clone();

        state.commit(RegistryEvent::StudentUpdated {
            student_number: updated.student_number.clone(),
        });

        info!(student_number = %updated.student_number, "Student updated");
        Ok(updated)
    }

    /// Removes a student, detaching it from its group first.
    ///
    /// The detach ignores the group's minimum size: the student is leaving
    /// the registry, not the group.
    #[instrument(skip(state))]
    pub fn delete_student(state: &mut AppState, student_number: &str) -> Result<(), AppError> {
        let student_number = student_number.trim();
        let Some(student) = state.registry.student(student_number) else {
            let err = AppError::not_found(anyhow!("Student {} not found", student_number));
            log_rejection(&err);
            return Err(err);
        };

        if let Some(group_id) = student.group_id {
            state.registry.unlink(student_number, group_id);
            info!(%group_id, "Detached student from group before deletion");
        }
        state.registry.remove_student(student_number);

        state.commit(RegistryEvent::StudentDeleted {
            student_number: student_number.to_string(),
        });

        info!("Student deleted");
        Ok(())
    }

    pub fn get_student(state: &AppState, student_number: &str) -> Result<Student, AppError> {
        state
            .registry
            .student(student_number.trim())
            .cloned()
            .ok_or_else(|| AppError::not_found(anyhow!("Student {} not found", student_number)))
    }

    pub fn get_all_students(state: &AppState) -> Vec<Student> {
        state.registry.students().cloned().collect()
    }

    pub fn get_students_without_group(state: &AppState) -> Vec<Student> {
        state
            .registry
            .students()
            .filter(|s| !s.is_assigned())
            .cloned()
            .collect()
    }

    /// Students whose name, number, or email contains `query`, ignoring case
    /// and accents. A blank query returns every student.
    #[instrument(skip(state))]
    pub fn search_students(state: &AppState, query: &str) -> Vec<Student> {
        let needle = fold(query.trim());
        state
            .registry
            .students()
            .filter(|s| {
                needle.is_empty()
                    || fold(&s.name).contains(&needle)
                    || fold(&s.student_number).contains(&needle)
                    || fold(&s.email).contains(&needle)
            })
            .cloned()
            .collect()
    }

    fn validate_new(state: &AppState, number: &str, name: &str, email: &str) -> Result<(), AppError> {
        if !is_all_digits(number) {
            return Err(AppError::invalid_format(anyhow!(
                "Student number must contain digits only"
            )));
        }

        if state.registry.contains_student(number) {
            return Err(AppError::duplicate_key(anyhow!(
                "Student number {} is already registered",
                number
            )));
        }

        Self::validate_profile(state, number, name, email, None)
    }

    /// Field checks shared by create and update. `exclude` is the student
    /// being edited, which may keep its own email.
    fn validate_profile(
        state: &AppState,
        number: &str,
        name: &str,
        email: &str,
        exclude: Option<&str>,
    ) -> Result<(), AppError> {
        if name.is_empty() || email.is_empty() || number.is_empty() {
            return Err(AppError::missing_field(anyhow!("All fields are required")));
        }

        if !has_accepted_domain(email, &state.rules.email_domains) {
            return Err(AppError::invalid_domain(anyhow!(
                "Email must belong to one of: {}",
                state
                    .rules
                    .email_domains
                    .iter()
                    .map(|d| format!("@{}", d))
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }

        if !is_valid_email_shape(email) {
            return Err(AppError::invalid_format(anyhow!(
                "'{}' is not a valid email address",
                email
            )));
        }

        let taken = state
            .registry
            .students()
            .filter(|s| Some(s.student_number.as_str()) != exclude)
            .any(|s| eq_ignore_case(&s.email, email));
        if taken {
            return Err(AppError::duplicate_value(anyhow!(
                "Email {} is already in use",
                email
            )));
        }

        if char_len(name) < MIN_NAME_LENGTH {
            return Err(AppError::invalid_format(anyhow!(
                "Name must have at least {} characters",
                MIN_NAME_LENGTH
            )));
        }

        if contains_digit(name) {
            return Err(AppError::invalid_format(anyhow!(
                "Name must not contain digits"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use groupwise_config::RulesConfig;
    use groupwise_core::ErrorKind;

    fn state() -> AppState {
        AppState::new(Box::new(MemoryStore::new()), RulesConfig::default())
    }

    fn dto(number: &str, name: &str, email: &str) -> CreateStudentDto {
        CreateStudentDto {
            student_number: number.to_string(),
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    fn kind(result: Result<Student, AppError>) -> ErrorKind {
        result.unwrap_err().kind()
    }

    #[test]
    fn test_create_trims_input() {
        let mut state = state();
        let student = StudentService::create_student(
            &mut state,
            dto(" 100 ", "  Ana Silva ", " ana@my.istec.pt "),
        )
        .unwrap();
        assert_eq!(student.student_number, "100");
        assert_eq!(student.name, "Ana Silva");
        assert_eq!(student.email, "ana@my.istec.pt");
    }

    #[test]
    fn test_empty_number_is_a_format_error() {
        let mut state = state();
        assert_eq!(
            kind(StudentService::create_student(&mut state, dto("", "Ana Silva", "ana@my.istec.pt"))),
            ErrorKind::InvalidFormat
        );
    }

    #[test]
    fn test_number_checked_before_duplicate() {
        let mut state = state();
        StudentService::create_student(&mut state, dto("100", "Ana Silva", "ana@my.istec.pt"))
            .unwrap();
        assert_eq!(
            kind(StudentService::create_student(&mut state, dto("10a", "Rui Sousa", "bad"))),
            ErrorKind::InvalidFormat
        );
        assert_eq!(
            kind(StudentService::create_student(&mut state, dto("100", "", ""))),
            ErrorKind::DuplicateKey
        );
    }

    #[test]
    fn test_missing_field_precedes_domain() {
        let mut state = state();
        assert_eq!(
            kind(StudentService::create_student(&mut state, dto("100", "", "ana@gmail.com"))),
            ErrorKind::MissingField
        );
    }

    #[test]
    fn test_domain_precedes_duplicate_email() {
        let mut state = state();
        StudentService::create_student(&mut state, dto("100", "Ana Silva", "ana@my.istec.pt"))
            .unwrap();
        assert_eq!(
            kind(StudentService::create_student(&mut state, dto("101", "Rui", "ana@gmail.com"))),
            ErrorKind::InvalidDomain
        );
        assert_eq!(
            kind(StudentService::create_student(&mut state, dto("101", "Ab", "ANA@my.istec.pt"))),
            ErrorKind::DuplicateValue
        );
    }

    #[test]
    fn test_malformed_email_with_accepted_suffix() {
        let mut state = state();
        assert_eq!(
            kind(StudentService::create_student(&mut state, dto("100", "Ana Silva", "a b@my.istec.pt"))),
            ErrorKind::InvalidFormat
        );
    }

    #[test]
    fn test_name_rules() {
        let mut state = state();
        assert_eq!(
            kind(StudentService::create_student(&mut state, dto("100", "Al", "al@my.istec.pt"))),
            ErrorKind::InvalidFormat
        );
        assert_eq!(
            kind(StudentService::create_student(&mut state, dto("100", "Ana 2", "al@my.istec.pt"))),
            ErrorKind::InvalidFormat
        );
        assert!(state.registry.student("100").is_none());
    }

    #[test]
    fn test_lookups_trim_the_number() {
        let mut state = state();
        StudentService::create_student(&mut state, dto("100", "Ana Silva", "ana@my.istec.pt"))
            .unwrap();

        let updated = StudentService::update_student(
            &mut state,
            " 100 ",
            UpdateStudentDto {
                name: "Ana Sofia Silva".to_string(),
                email: "ana@my.istec.pt".to_string(),
            },
        )
        .unwrap();
        assert_eq!(updated.name, "Ana Sofia Silva");
        assert!(StudentService::get_student(&state, " 100 ").is_ok());

        StudentService::delete_student(&mut state, " 100 ").unwrap();
        assert!(state.registry.student("100").is_none());
    }

    #[test]
    fn test_search_ignores_accents_and_case() {
        let mut state = state();
        StudentService::create_student(&mut state, dto("100", "Inês Gonçalves", "ines@my.istec.pt"))
            .unwrap();
        StudentService::create_student(&mut state, dto("200", "Rui Sousa", "rui@istec.pt"))
            .unwrap();

        let hits = StudentService::search_students(&state, "GONCALVES");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].student_number, "100");

        assert_eq!(StudentService::search_students(&state, "20").len(), 1);
        assert_eq!(StudentService::search_students(&state, "istec").len(), 2);
        assert_eq!(StudentService::search_students(&state, "  ").len(), 2);
        assert!(StudentService::search_students(&state, "zzz").is_empty());
    }
}
