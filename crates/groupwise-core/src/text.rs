//! Text predicates and search folding.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;
use validator::ValidateEmail;

/// Case- and diacritic-insensitive form of `s` used for search matching.
///
/// `"José Álvares"` folds to `"jose alvares"`.
pub fn fold(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Returns `true` when `haystack` contains `needle` after folding both.
pub fn fold_contains(haystack: &str, needle: &str) -> bool {
    fold(haystack).contains(&fold(needle))
}

/// Non-empty and ASCII digits only.
pub fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

pub fn contains_digit(s: &str) -> bool {
    s.chars().any(char::is_numeric)
}

/// Non-empty and made of ASCII letters, digits, and spaces.
pub fn is_alphanumeric_with_spaces(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ')
}

/// Length in characters, not bytes.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Case-insensitive equality.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

pub fn is_valid_email_shape(email: &str) -> bool {
    email.validate_email()
}

/// Returns `true` when `email` ends with `@<domain>` for one of `domains`,
/// compared case-insensitively.
pub fn has_accepted_domain<S: AsRef<str>>(email: &str, domains: &[S]) -> bool {
    let email = email.to_lowercase();
    domains.iter().any(|domain| {
        let domain = domain.as_ref().trim().trim_start_matches('@').to_lowercase();
        !domain.is_empty() && email.ends_with(&format!("@{}", domain))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_strips_accents_and_case() {
        assert_eq!(fold("José Álvares"), "jose alvares");
        assert_eq!(fold("CONCEIÇÃO"), "conceicao");
    }

    #[test]
    fn test_fold_contains() {
        assert!(fold_contains("Inês Gonçalves", "goncal"));
        assert!(fold_contains("a.b@my.istec.pt", "ISTEC"));
        assert!(!fold_contains("Rui", "ana"));
    }

    #[test]
    fn test_is_all_digits() {
        assert!(is_all_digits("2024001"));
        assert!(!is_all_digits(""));
        assert!(!is_all_digits("12a"));
        assert!(!is_all_digits("-12"));
    }

    #[test]
    fn test_alphanumeric_with_spaces() {
        assert!(is_alphanumeric_with_spaces("Team 7"));
        assert!(!is_alphanumeric_with_spaces("Team-7"));
        assert!(!is_alphanumeric_with_spaces("Équipe"));
        assert!(!is_alphanumeric_with_spaces(""));
    }

    #[test]
    fn test_accepted_domain() {
        let domains = ["my.istec.pt", "@istec.pt"];
        assert!(has_accepted_domain("ana@my.istec.pt", &domains));
        assert!(has_accepted_domain("ANA@ISTEC.PT", &domains));
        assert!(!has_accepted_domain("ana@gmail.com", &domains));
        assert!(!has_accepted_domain("ana@notistec.pt", &domains));
    }

    #[test]
    fn test_char_len_counts_chars() {
        assert_eq!(char_len("Zé"), 2);
    }
}
