use std::fmt;

use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::cli::core::CommandError;
use crate::cli::output;
use crate::cli::ui::test_mode::{self, TextTestInput};

/// Print an informational message via the standard CLI output helpers.
pub fn print_info(message: impl fmt::Display) {
    output::info(message);
}

pub fn print_warning(message: impl fmt::Display) {
    output::warning(message);
}

pub fn print_error(message: impl fmt::Display) {
    output::error(message);
}

pub fn print_success(message: impl fmt::Display) {
    output::success(message);
}

pub fn print_hint(message: impl fmt::Display) {
    output::hint(message);
}

/// Prompt the user for confirmation with a yes/no question. Scripted text
/// inputs answer the question when test mode is active.
pub fn confirm_action(prompt: &str, default: bool) -> Result<bool, CommandError> {
    if let Some(scripted) = test_mode::next_text_input(prompt) {
        return Ok(match scripted {
            TextTestInput::Value(value) => parse_yes_no(&value).unwrap_or(default),
            TextTestInput::Keep => default,
            _ => false,
        });
    }

    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}

/// Accepts the usual spellings of yes and no.
pub fn parse_yes_no(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" | "on" => Some(true),
        "n" | "no" | "false" | "0" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_no_spellings() {
        assert_eq!(parse_yes_no(" YES "), Some(true));
        assert_eq!(parse_yes_no("off"), Some(false));
        assert_eq!(parse_yes_no("maybe"), None);
    }

    #[test]
    fn prompt_failures_become_command_errors() {
        let failure = dialoguer::Error::IO(std::io::Error::new(
            std::io::ErrorKind::Other,
            "terminal gone",
        ));
        let err = CommandError::from(failure);
        assert!(matches!(err, CommandError::Dialoguer(_)));
        assert!(err.to_string().contains("terminal gone"));
    }
}
