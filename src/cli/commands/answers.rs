use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::fields::{self, Collection};
use crate::cli::io;

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "set",
            "Change a field of the current step",
            "set <field> <value>",
            cmd_set,
        ),
        CommandDefinition::new(
            "add",
            "Select a service or skill",
            "add <services|skills> <label> | add services --filter <term>",
            cmd_add,
        ),
        CommandDefinition::new(
            "remove",
            "Deselect a service or skill",
            "remove <services|skills> <label>",
            cmd_remove,
        ),
        CommandDefinition::new(
            "clear",
            "Deselect every service or skill",
            "clear <services|skills>",
            cmd_clear,
        ),
    ]
}

fn report_field(context: &mut ShellContext, field: &'static str) -> CommandResult {
    let active = context.active_step_mut()?;
    let value = fields::draft_value(active, field);
    io::print_info(format!("{} = {}", field, value));
    if let Some(message) = active.errors().get(field) {
        io::print_warning(format!("{}: {}", field, message));
    }
    Ok(())
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (name, rest) = args
        .split_first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: set <field> <value>".into()))?;
    let field = fields::resolve_field(name)?;
    let value = rest.join(" ");
    let active = context.active_step_mut()?;
    if let Some(note) = fields::set_field(active, field, &value)? {
        io::print_warning(note);
        return Ok(());
    }
    report_field(context, field)
}

fn list_and_label<'a>(args: &'a [&'a str], usage: &str) -> Result<(Collection, String), CommandError> {
    let (list, rest) = args
        .split_first()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))?;
    Ok((Collection::parse(list)?, rest.join(" ")))
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let [list, "--filter", term @ ..] = args {
        if Collection::parse(list)? != Collection::Services {
            return Err(CommandError::InvalidArguments(
                "`--filter` only applies to services".into(),
            ));
        }
        let term = term.join(" ");
        let count = fields::select_matching_services(context.active_step_mut()?, &term)?;
        io::print_info(format!("Selected {} service(s) matching `{}`.", count, term));
        return report_field(context, Collection::Services.field());
    }

    let (list, label) = list_and_label(args, "add <services|skills> <label>")?;
    let change = fields::add_label(context.active_step_mut()?, list, &label)?;
    if !change.changed {
        io::print_info(format!("`{}` is already selected.", change.label));
    }
    if let Some(note) = change.note {
        io::print_warning(note);
    }
    report_field(context, list.field())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (list, label) = list_and_label(args, "remove <services|skills> <label>")?;
    let change = fields::remove_label(context.active_step_mut()?, list, &label)?;
    if !change.changed {
        io::print_info(format!("`{}` was not selected.", change.label));
    }
    report_field(context, list.field())
}

fn cmd_clear(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (list, _) = list_and_label(args, "clear <services|skills>")?;
    fields::clear_list(context.active_step_mut()?, list)?;
    report_field(context, list.field())
}

#[cfg(test)]
mod tests {
    use crate::cli::core::process_script;
    use crate::steps::ActiveStep;

    fn services_of(app: &crate::cli::core::ShellContext) -> Vec<String> {
        match &app.active_step {
            Some(ActiveStep::Services(controller)) => controller
                .draft()
                .selected()
                .iter()
                .map(str::to_string)
                .collect(),
            _ => panic!("expected services step"),
        }
    }

    #[test]
    fn duplicate_add_and_remove_are_harmless() {
        let app = process_script(&[
            "goto /step/3",
            "add services \"UI Design\"",
            "add services \"UI Design\"",
        ])
        .expect("script runs");
        assert_eq!(services_of(&app), vec!["UI Design"]);

        let app = process_script(&[
            "goto /step/3",
            "add services \"UI Design\"",
            "remove services \"UI Design\"",
            "remove services \"UI Design\"",
        ])
        .expect("script runs");
        assert!(services_of(&app).is_empty());
    }

    #[test]
    fn filter_then_clear() {
        let app = process_script(&["goto /step/3", "add services --filter marketing"])
            .expect("script runs");
        assert_eq!(services_of(&app).len(), 3);

        let app = process_script(&[
            "goto /step/3",
            "add services --filter marketing",
            "clear services",
        ])
        .expect("script runs");
        assert!(services_of(&app).is_empty());
    }

    #[test]
    fn edits_without_confirmation_do_not_touch_the_store() {
        let app = process_script(&["goto /step/1", "set fullName \"Ada Lovelace\""])
            .expect("script runs");
        assert_eq!(app.store.answers().full_name, "");
        assert!(app.active_step.as_ref().expect("on step").is_dirty());
    }
}
