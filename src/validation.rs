//! Field validation primitives shared by the step schemas.
//!
//! A step either validates completely, yielding a normalized value set, or
//! yields at least one [`FieldErrors`] entry. There is no partial success.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    answers::FormAnswers,
    sequencer::StepNumber,
    steps::{self, BasicInfoStep, PreferencesStep, ScheduleStep, ServicesStep, SkillsStep},
};

pub const NAME_TOO_SHORT: &str = "Name must be at least 3 characters";
pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const ROLE_REQUIRED: &str = "Please select a role";
pub const DATE_REQUIRED: &str = "Please select a date";
pub const TIME_REQUIRED: &str = "Please select a time";
pub const TIMEZONE_REQUIRED: &str = "Please select a timezone";
pub const SERVICES_REQUIRED: &str = "Please select at least one service";
pub const SKILLS_REQUIRED: &str = "Please select at least one skill";
pub const WORK_PREFERENCE_REQUIRED: &str = "Please select a work preference";
pub const TERMS_REQUIRED: &str = "You must accept the terms to continue";

pub const MIN_NAME_CHARS: usize = 3;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-]+(\.[A-Za-z0-9_'+\-]+)*@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .expect("valid email pattern")
});

/// Field name to message mapping, kept in the order the errors were found.
/// Only the first error per field is recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(&'static str, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        if !self.contains(field) {
            self.entries.push((field, message.into()));
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries
            .iter()
            .map(|(name, message)| (*name, message.as_str()))
    }

    /// `Ok(value)` when nothing was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect();
        f.write_str(&rendered.join("; "))
    }
}

/// Built-in text validation rules. Each returns the normalized value or the
/// message to show next to the field.
#[derive(Debug, Clone, Copy)]
pub enum Validator {
    MinChars(usize, &'static str),
    Email(&'static str),
    OneOf(&'static [&'static str], &'static str),
}

impl Validator {
    pub fn validate(&self, input: &str) -> Result<String, String> {
        let trimmed = input.trim();
        match self {
            Validator::MinChars(min, message) => {
                if trimmed.chars().count() >= *min {
                    Ok(trimmed.to_string())
                } else {
                    Err((*message).to_string())
                }
            }
            Validator::Email(message) => {
                if EMAIL_PATTERN.is_match(trimmed) {
                    Ok(trimmed.to_string())
                } else {
                    Err((*message).to_string())
                }
            }
            Validator::OneOf(options, message) => options
                .iter()
                .find(|candidate| candidate.eq_ignore_ascii_case(trimmed))
                .map(|candidate| (*candidate).to_string())
                .ok_or_else(|| (*message).to_string()),
        }
    }
}

/// Runs `validator` against `input`, recording a failure under `field`.
pub fn check_text(
    errors: &mut FieldErrors,
    field: &'static str,
    input: &str,
    validator: &Validator,
) -> Option<String> {
    match validator.validate(input) {
        Ok(value) => Some(value),
        Err(message) => {
            errors.insert(field, message);
            None
        }
    }
}

/// Records `message` under `field` when `value` is missing.
pub fn require<T>(
    errors: &mut FieldErrors,
    field: &'static str,
    value: Option<T>,
    message: &'static str,
) -> Option<T> {
    if value.is_none() {
        errors.insert(field, message);
    }
    value
}

pub fn is_valid_email(input: &str) -> bool {
    EMAIL_PATTERN.is_match(input.trim())
}

/// Field errors of every failing step, in step order.
pub type StepErrors = Vec<(StepNumber, FieldErrors)>;

/// Runs all five step schemas against stored answers. The form as a whole is
/// only valid when every step is.
pub fn validate_all(answers: &FormAnswers) -> Result<(), StepErrors> {
    let failures: StepErrors = [
        steps::check::<BasicInfoStep>(answers),
        steps::check::<ScheduleStep>(answers),
        steps::check::<ServicesStep>(answers),
        steps::check::<SkillsStep>(answers),
        steps::check::<PreferencesStep>(answers),
    ]
    .into_iter()
    .flatten()
    .collect();
    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_pattern_accepts_common_addresses() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.co.uk"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("two@@example.com"));
    }

    #[test]
    fn min_chars_counts_trimmed_characters() {
        let rule = Validator::MinChars(MIN_NAME_CHARS, NAME_TOO_SHORT);
        assert_eq!(rule.validate("  Al  "), Err(NAME_TOO_SHORT.to_string()));
        assert_eq!(rule.validate(" Ada "), Ok("Ada".to_string()));
    }

    #[test]
    fn one_of_returns_canonical_option() {
        let rule = Validator::OneOf(&["09:00 AM", "09:30 AM"], TIME_REQUIRED);
        assert_eq!(rule.validate("09:30 am"), Ok("09:30 AM".to_string()));
        assert_eq!(rule.validate("10:00 AM"), Err(TIME_REQUIRED.to_string()));
    }

    #[test]
    fn field_errors_keep_first_message_per_field() {
        let mut errors = FieldErrors::new();
        errors.insert("email", "first");
        errors.insert("email", "second");
        errors.insert("role", ROLE_REQUIRED);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("email"), Some("first"));
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["email", "role"]);
        assert!(errors.into_result(()).is_err());
    }

    #[test]
    fn validate_all_names_every_failing_step() {
        let answers = FormAnswers {
            full_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            role: Some(crate::answers::Role::Developer),
            ..FormAnswers::default()
        };
        let failures = validate_all(&answers).expect_err("incomplete");
        let failing: Vec<u8> = failures.iter().map(|(step, _)| step.get()).collect();
        assert_eq!(failing, vec![2, 3, 4, 5]);
    }

    #[test]
    fn require_records_missing_values() {
        let mut errors = FieldErrors::new();
        assert_eq!(require(&mut errors, "role", Some(1), ROLE_REQUIRED), Some(1));
        assert_eq!(require::<u8>(&mut errors, "date", None, DATE_REQUIRED), None);
        assert_eq!(errors.get("date"), Some(DATE_REQUIRED));
    }
}
