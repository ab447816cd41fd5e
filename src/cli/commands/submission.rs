use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::sequencer::Route;

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "submit",
            "Submit the application from the review screen",
            "submit",
            cmd_submit,
        ),
        CommandDefinition::new(
            "start-over",
            "Clear every answer and return to the entry screen",
            "start-over",
            cmd_start_over,
        ),
    ]
}

fn cmd_submit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.route != Route::Review {
        return Err(CommandError::InvalidArguments(
            "Submission happens on the review screen. Use `review` first.".into(),
        ));
    }
    let receipt = context.submit()?;
    io::print_success(format!(
        "Application submitted at {}. Reference: {}",
        receipt.submitted_at.format("%Y-%m-%d %H:%M:%S UTC"),
        receipt.id
    ));
    io::print_hint("Use `start-over` to begin a new application.");
    Ok(())
}

fn cmd_start_over(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.mode() == CliMode::Interactive
        && !io::confirm_action("Clear every answer and start over?", false)?
    {
        io::print_info("Start over cancelled.");
        return Ok(());
    }
    context.start_over()?;
    io::print_success("All answers cleared.");
    Ok(())
}
