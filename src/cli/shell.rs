use std::{
    fmt,
    io::{self, BufRead},
};

use shell_words::split;
use tracing::debug;

use crate::cli::core::{CliError, CliMode, CommandError, LoopControl, ShellContext, ShellOptions};
use crate::cli::output::info as output_info;
use crate::cli::wizard::Wizard;

pub const SCRIPT_MODE_VAR: &str = "FORM_WIZARD_CLI_SCRIPT";

pub fn run_cli(options: ShellOptions) -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_MODE_VAR).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode, options)?;

    let result = match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    };
    debug!(state = %context.status(), "shell finished");
    result
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    Wizard::new().run(context)?;
    output_info("Goodbye. Confirmed steps are saved for next time.");
    Ok(())
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !context.running {
            break;
        }
        let line = line?;
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

fn handle_line(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let tokens = match parse_command_line(trimmed) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.print_warning(&err.message);
            return Ok(LoopControl::Continue);
        }
    };

    if tokens.is_empty() {
        return Ok(LoopControl::Continue);
    }

    let raw = &tokens[0];
    let command = raw.to_lowercase();
    let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();

    context.last_command = Some(trimmed.to_string());

    match context.dispatch(&command, raw, &args) {
        Ok(LoopControl::Exit) => {
            context.running = false;
            Ok(LoopControl::Exit)
        }
        other => other,
    }
}

pub(crate) fn parse_command_line(input: &str) -> Result<Vec<String>, ParseError> {
    split(input).map_err(|err| ParseError {
        message: err.to_string(),
    })
}

#[derive(Debug)]
pub(crate) struct ParseError {
    message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::test_context;

    #[test]
    fn quoted_values_stay_together() {
        assert_eq!(
            parse_command_line("set fullName \"Ada Lovelace\"").unwrap(),
            vec!["set", "fullName", "Ada Lovelace"]
        );
        assert!(parse_command_line("set fullName \"Ada").is_err());
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let mut context = test_context();
        assert_eq!(
            handle_line(&mut context, "# a note").unwrap(),
            LoopControl::Continue
        );
        assert_eq!(handle_line(&mut context, "   ").unwrap(), LoopControl::Continue);
        assert_eq!(context.last_command, None);

        assert_eq!(handle_line(&mut context, "exit").unwrap(), LoopControl::Exit);
        assert!(!context.running);
    }
}
