//! Registration password policy.
//!
//! A password needs at least [`MIN_LENGTH`] characters, one uppercase and one
//! lowercase ASCII letter. The identity provider applies its own rules on top.

use std::fmt;

pub const MIN_LENGTH: usize = 6;

/// A single unmet password requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRequirement {
    MinLength,
    Uppercase,
    Lowercase,
}

impl PasswordRequirement {
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::MinLength => "at least 6 characters",
            Self::Uppercase => "an uppercase letter",
            Self::Lowercase => "a lowercase letter",
        }
    }
}

impl fmt::Display for PasswordRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Return every requirement `password` fails. Empty means acceptable.
#[must_use]
pub fn unmet_requirements(password: &str) -> Vec<PasswordRequirement> {
    let mut unmet = Vec::new();
    if password.chars().count() < MIN_LENGTH {
        unmet.push(PasswordRequirement::MinLength);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        unmet.push(PasswordRequirement::Uppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        unmet.push(PasswordRequirement::Lowercase);
    }
    unmet
}

/// Validate a password, naming every unmet requirement in the error.
///
/// # Errors
///
/// Returns [`crate::CoreError::Validation`] when any requirement is unmet.
pub fn check(password: &str) -> Result<(), crate::CoreError> {
    let unmet = unmet_requirements(password);
    if unmet.is_empty() {
        return Ok(());
    }
    let names: Vec<&str> = unmet.iter().map(|r| r.describe()).collect();
    Err(crate::CoreError::Validation(format!(
        "password must contain {}",
        names.join(", ")
    )))
}
