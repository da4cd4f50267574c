// Password acceptability checks shared by the forms and the auth service

/// Minimum number of characters in an acceptable password
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Punctuation that satisfies the special character requirement
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*";

/// Message shown under the password field while the predicate fails
pub const PASSWORD_REQUIREMENTS: &str =
    "Must contain 8+ chars with at least: 1 uppercase, 1 lowercase, 1 number, 1 special char";

/// Individual requirement a password failed to meet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRequirement {
    MinLength,
    Uppercase,
    Lowercase,
    Digit,
    SpecialCharacter,
}

/// Check a password and report every unmet requirement
pub fn check_password(password: &str) -> Result<(), Vec<PasswordRequirement>> {
    let mut missing = Vec::new();

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        missing.push(PasswordRequirement::MinLength);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        missing.push(PasswordRequirement::Uppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        missing.push(PasswordRequirement::Lowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        missing.push(PasswordRequirement::Digit);
    }
    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        missing.push(PasswordRequirement::SpecialCharacter);
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

pub fn is_acceptable_password(password: &str) -> bool {
    check_password(password).is_ok()
}
