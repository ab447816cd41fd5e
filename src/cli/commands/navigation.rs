use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::current_preferences;
use crate::cli::render;
use crate::review::{edit_target, Section};
use crate::sequencer::{Route, StepNumber};
use crate::steps::StepOutcome;

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "goto",
            "Open a wizard path",
            "goto </|/step/<n>|/review>",
            cmd_goto,
        ),
        CommandDefinition::new("show", "Show the current screen", "show", cmd_show),
        CommandDefinition::new(
            "next",
            "Validate and save the current step, then advance",
            "next",
            cmd_next,
        ),
        CommandDefinition::new("back", "Go to the previous screen", "back", cmd_back),
        CommandDefinition::new("review", "Open the review screen", "review", cmd_review),
        CommandDefinition::new(
            "edit",
            "Jump from the review to a section",
            "edit <step number|section>",
            cmd_edit,
        ),
    ]
}

/// Prints whatever the current route displays.
pub(crate) fn print_screen(context: &ShellContext) {
    let plain = current_preferences().plain_mode;
    let lines = match (&context.route, &context.active_step) {
        (Route::Step(_), Some(active)) => render::step_screen(active, plain),
        (Route::Review, _) => render::review_screen(
            &context.review.summary(&context.store),
            context.review.state(),
            plain,
        ),
        _ => render::entry_screen(&context.store, plain),
    };
    for line in lines {
        io::print_info(line);
    }
}

fn announce(context: &ShellContext) {
    match context.route.position() {
        Some(position) => io::print_info(format!(
            "Now at {} ({})",
            context.route.path(),
            render::progress_line(position)
        )),
        None => io::print_info("Now at the entry screen (/)"),
    }
}

/// Accepts full paths as well as the shorthands `3` and `review`.
fn normalize_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else if trimmed.chars().all(|ch| ch.is_ascii_digit() || ch == '-') {
        format!("/step/{}", trimmed)
    } else {
        format!("/{}", trimmed)
    }
}

fn cmd_goto(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args.first().ok_or_else(|| {
        CommandError::InvalidArguments("usage: goto </|/step/<n>|/review>".into())
    })?;
    let path = normalize_path(raw);
    let resolution = context.goto_path(&path);
    if resolution.redirected {
        io::print_warning(format!(
            "`{}` is not a wizard screen; showing {} instead.",
            path,
            resolution.route.path()
        ));
    }
    announce(context);
    Ok(())
}

fn cmd_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    print_screen(context);
    Ok(())
}

fn cmd_next(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match context.route {
        Route::Entry => {
            context.navigate(Route::Step(StepNumber::FIRST));
            announce(context);
            return Ok(());
        }
        Route::Review => {
            io::print_hint("This is the last screen. Use `submit` to send the application.");
            return Ok(());
        }
        Route::Step(_) => {}
    }

    let step = context.active_step_mut()?.step();
    match context.confirm_step()? {
        StepOutcome::Rejected(errors) => {
            io::print_error(format!(
                "{} has {} problem(s):",
                step.title(),
                errors.len()
            ));
            for (field, message) in errors.iter() {
                io::print_info(format!("  {}: {}", field, message));
            }
        }
        StepOutcome::Advanced(_) => {
            io::print_success(format!("Saved {}.", step.label()));
            announce(context);
        }
    }
    Ok(())
}

fn cmd_back(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.back();
    announce(context);
    Ok(())
}

fn cmd_review(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.navigate(Route::Review);
    announce(context);
    Ok(())
}

fn parse_section(raw: &str) -> Option<Section> {
    let needle = raw.trim();
    Section::ALL.into_iter().find(|section| {
        section.step().to_string() == needle
            || section.step().label().eq_ignore_ascii_case(needle)
            || section.title().eq_ignore_ascii_case(needle)
    })
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args.join(" ");
    let section = parse_section(&raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "Unknown section `{}`; use a step number from 1 to {}",
            raw,
            StepNumber::COUNT
        ))
    })?;
    context.navigate(Route::from(edit_target(section)));
    announce(context);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::process_script;

    #[test]
    fn shorthand_paths_expand() {
        assert_eq!(normalize_path("3"), "/step/3");
        assert_eq!(normalize_path("review"), "/review");
        assert_eq!(normalize_path("/step/x"), "/step/x");
    }

    #[test]
    fn sections_match_numbers_and_names() {
        assert_eq!(parse_section("2"), Some(Section::Schedule));
        assert_eq!(parse_section("skills"), Some(Section::Skills));
        assert_eq!(parse_section("Basic Information"), Some(Section::BasicInfo));
        assert_eq!(parse_section("9"), None);
    }

    #[test]
    fn edit_leaves_answers_untouched() {
        let app = process_script(&["review", "edit 3"]).expect("script runs");
        assert_eq!(app.route, Route::Step(StepNumber::SERVICES));
        assert_eq!(app.store.completed_steps(), Vec::<StepNumber>::new());
    }

    #[test]
    fn next_from_entry_opens_step_one() {
        let app = process_script(&["next"]).expect("script runs");
        assert_eq!(app.route, Route::Step(StepNumber::FIRST));
    }
}
