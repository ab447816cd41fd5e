use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::review::ReviewState;
use crate::store::STATE_VERSION;
use crate::utils::build_info;

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "status",
            "Show progress, saved steps, and storage",
            "status",
            cmd_status,
        ),
        CommandDefinition::new("version", "Show build metadata", "version", cmd_version),
        CommandDefinition::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandDefinition::new("exit", "Exit the wizard", "exit", cmd_exit),
    ]
}

fn cmd_status(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output_section("Status");
    io::print_info(format!("  Location     : {}", context.route.path()));

    let completed = context.store.completed_steps();
    let completed = if completed.is_empty() {
        "none".to_string()
    } else {
        completed
            .iter()
            .map(|step| format!("{} ({})", step, step.label()))
            .collect::<Vec<_>>()
            .join(", ")
    };
    io::print_info(format!("  Completed    : {}", completed));

    if let Some(active) = &context.active_step {
        io::print_info(format!(
            "  Draft        : {}",
            if active.is_dirty() { "unsaved changes" } else { "saved" }
        ));
    }

    let review = match context.review.state() {
        ReviewState::Reviewing => "not submitted".to_string(),
        ReviewState::Submitting => "submitting".to_string(),
        ReviewState::Submitted(receipt) => format!("submitted ({})", receipt.id),
        ReviewState::Failed(message) => format!("failed: {}", message),
    };
    io::print_info(format!("  Submission   : {}", review));
    io::print_info(format!(
        "  Storage      : {}",
        context.store.backend_description()
    ));
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Form Wizard {}", meta.version));
    io::print_info(format!("  State format : v{}", STATE_VERSION));
    for line in meta.lines() {
        io::print_info(format!("  {}", line));
    }
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(command) = args.first().map(|name| name.to_lowercase()) {
        if let Some(command) = context.command(&command) {
            help::print_command(command);
        } else {
            context.suggest_command(args[0]);
        }
        return Ok(());
    }

    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
