//! Menu-driven flow used when the shell owns a terminal.
//!
//! Every screen is an arrow-key menu whose context block shows the current
//! answers. Messages produced while handling a choice are carried into the
//! next screen as notices because menus redraw the whole terminal.

use chrono::{Local, NaiveDate};

use crate::{
    answers::{fields as names, Role, WorkPreference},
    catalog::{self, AVAILABLE_SKILLS, TIMEZONES, TIME_SLOTS},
    errors::WizardError,
    review::{ReviewState, Section},
    sequencer::{self, Route, StepNumber},
    steps::StepOutcome,
};

use super::core::{CliError, CommandError, LoopControl, ShellContext};
use super::fields::{self, Collection, DATE_FORMAT};
use super::output::{apply_style, current_preferences, MessageKind};
use super::render;
use super::ui::formatting::Formatter;
use super::ui::menu_renderer::{MenuRenderer, MenuUI, MenuUIItem};
use super::ui::prompts::{self, ChoicePromptResult, StepAction, TextPromptResult};

const DONE_KEY: &str = "__DONE";
const ALL_KEY: &str = "__ALL";
const CLEAR_KEY: &str = "__CLEAR";

pub(crate) struct Wizard {
    notices: Vec<String>,
}

impl Wizard {
    pub(crate) fn new() -> Self {
        Self {
            notices: Vec::new(),
        }
    }

    pub(crate) fn run(&mut self, context: &mut ShellContext) -> Result<(), CliError> {
        while context.running {
            let control = match context.route {
                Route::Entry => self.entry(context),
                Route::Step(_) => self.step(context),
                Route::Review => self.review(context),
            };
            match control {
                Ok(LoopControl::Continue) => {}
                Ok(LoopControl::Exit) => {
                    context.running = false;
                }
                Err(err) => self.absorb(err)?,
            }
        }
        for notice in self.notices.drain(..) {
            println!("{}", notice);
        }
        Ok(())
    }

    fn notice(&mut self, kind: MessageKind, message: impl std::fmt::Display) {
        self.notices
            .push(apply_style(kind, message, &current_preferences()));
    }

    /// Keeps recoverable errors on screen; terminal failures end the run.
    fn absorb(&mut self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::Io(err) => Err(CliError::Io(err)),
            CommandError::ExitRequested => Ok(()),
            CommandError::Core(WizardError::Incomplete(message)) => {
                self.notice(MessageKind::Error, format!("Cannot submit yet: {}", message));
                self.notice(MessageKind::Hint, "Use the Edit entries to finish those steps.");
                Ok(())
            }
            other => {
                self.notice(MessageKind::Error, other);
                Ok(())
            }
        }
    }

    /// Screen lines prefixed with pending notices, which are consumed.
    fn with_notices(&mut self, mut lines: Vec<String>) -> Vec<String> {
        if self.notices.is_empty() {
            return lines;
        }
        let mut combined: Vec<String> = self.notices.drain(..).collect();
        combined.push(String::new());
        combined.append(&mut lines);
        combined
    }

    fn show(&mut self, menu: MenuUI) -> Result<Option<String>, CommandError> {
        MenuRenderer::new()
            .show(&menu)
            .map_err(|err| CommandError::Message(format!("menu failed: {:?}", err)))
    }

    fn exit_requested(&self, context: &ShellContext) -> Result<LoopControl, CommandError> {
        if context.confirm_exit()? {
            Ok(LoopControl::Exit)
        } else {
            Ok(LoopControl::Continue)
        }
    }

    fn entry(&mut self, context: &mut ShellContext) -> Result<LoopControl, CommandError> {
        let plain = current_preferences().plain_mode;
        let started = !context.store.completed_steps().is_empty();

        let mut items = Vec::new();
        if started {
            items.push(MenuUIItem::new(
                "resume",
                "Continue",
                "Pick up at the first unfinished step",
            ));
            items.push(MenuUIItem::new("review", "Review", "See every answer so far"));
            items.push(MenuUIItem::new(
                "start-over",
                "Start over",
                "Clear every answer",
            ));
        } else {
            items.push(MenuUIItem::new("start", "Start", "Begin with step 1"));
        }
        items.push(MenuUIItem::new("exit", "Exit", "Leave the wizard"));

        let lines = self.with_notices(render::entry_screen(&context.store, plain));
        let menu = MenuUI::new("Welcome", items).with_context(lines.join("\n"));

        match self.show(menu)?.as_deref() {
            Some("start") => context.navigate(Route::Step(StepNumber::FIRST)),
            Some("resume") => {
                let route = context.resume_route();
                context.navigate(route);
            }
            Some("review") => context.navigate(Route::Review),
            Some("start-over") => {
                if super::io::confirm_action("Clear every answer and start over?", false)? {
                    context.start_over()?;
                    self.notice(MessageKind::Success, "All answers cleared.");
                }
            }
            // ESC on the entry screen leaves without asking; nothing is unsaved here.
            None => return Ok(LoopControl::Exit),
            _ => return self.exit_requested(context),
        }
        Ok(LoopControl::Continue)
    }

    fn step(&mut self, context: &mut ShellContext) -> Result<LoopControl, CommandError> {
        let plain = current_preferences().plain_mode;
        let active = context.active_step.as_ref().ok_or(CommandError::NotOnStep)?;
        let step = active.step();
        let lines = self.with_notices(render::step_screen(active, plain));

        match prompts::step_actions_menu(step.title(), &lines)? {
            StepAction::Continue => match context.confirm_step()? {
                StepOutcome::Rejected(errors) => self.notice(
                    MessageKind::Error,
                    format!("Please fix {} field(s) before continuing.", errors.len()),
                ),
                StepOutcome::Advanced(_) => {
                    self.notice(MessageKind::Success, format!("Saved {}.", step.label()))
                }
            },
            StepAction::EditFields => self.edit_fields(context)?,
            StepAction::Back => {
                if context.active_step.as_ref().is_some_and(|active| active.is_dirty()) {
                    self.notice(
                        MessageKind::Warning,
                        format!("Unsaved changes on {} were discarded.", step.label()),
                    );
                }
                context.back();
            }
            StepAction::Exit => return self.exit_requested(context),
        }
        Ok(LoopControl::Continue)
    }

    fn edit_fields(&mut self, context: &mut ShellContext) -> Result<(), CommandError> {
        let mut last_index = 0;
        loop {
            let active = context.active_step.as_ref().ok_or(CommandError::NotOnStep)?;
            let visible = fields::visible_fields(active);
            let mut items: Vec<MenuUIItem> = visible
                .iter()
                .map(|field| {
                    let mut value = fields::draft_value(active, field);
                    if let Some(message) = active.errors().get(field) {
                        value = format!("{}  ({})", value, message);
                    }
                    MenuUIItem::new(*field, fields::field_label(field), value)
                })
                .collect();
            items.push(MenuUIItem::new(DONE_KEY, "Done", "Back to the step"));

            let title = format!("Edit {}", active.step().title());
            let mut menu = MenuUI::new(title, items).with_initial_index(last_index);
            let notices = self.with_notices(Vec::new());
            if !notices.is_empty() {
                menu = menu.with_context(notices.join("\n"));
            }

            let Some(key) = self.show(menu)? else {
                return Ok(());
            };
            let Some(index) = visible.iter().position(|field| *field == key) else {
                return Ok(());
            };
            last_index = index;
            if let Err(err) = self.prompt_field(context, visible[index]) {
                match err {
                    CommandError::InvalidArguments(message) => {
                        self.notice(MessageKind::Error, message)
                    }
                    other => return Err(other),
                }
            }
        }
    }

    fn prompt_field(
        &mut self,
        context: &mut ShellContext,
        field: &'static str,
    ) -> Result<(), CommandError> {
        let label = fields::field_label(field);
        let current = fields::draft_value(context.active_step_mut()?, field);

        let value = match field {
            names::FULL_NAME | names::EMAIL | names::INTERESTED_TOPICS => {
                text_value(label, &current)?
            }
            names::PREFERRED_DATE => {
                let Some(raw) = text_value(&format!("{} (YYYY-MM-DD)", label), &current)? else {
                    return Ok(());
                };
                match fields::parse_date(&raw)? {
                    Some(date) if date < today() => {
                        self.notice(
                            MessageKind::Error,
                            "Please choose today or a later date.",
                        );
                        return Ok(());
                    }
                    Some(date) => Some(date.format(DATE_FORMAT).to_string()),
                    None => Some(String::new()),
                }
            }
            names::ROLE => choice_value(label, Role::ALL.iter().map(|role| role.label()), &current)?,
            names::PREFERRED_TIME => choice_value(label, TIME_SLOTS, &current)?,
            names::TIMEZONE => choice_value(label, TIMEZONES, &current)?,
            names::WORK_PREFERENCE => choice_value(
                label,
                WorkPreference::ALL.iter().map(|preference| preference.label()),
                &current,
            )?,
            names::SERVICES => return self.pick_services(context),
            names::SKILLS => return self.pick_skills(context),
            _ => prompts::yes_no_menu(label, &[], current == "Yes")?
                .map(|flag| (if flag { "yes" } else { "no" }).to_string()),
        };

        if let Some(value) = value {
            if let Some(note) = fields::set_field(context.active_step_mut()?, field, &value)? {
                self.notice(MessageKind::Warning, note);
            }
        }
        Ok(())
    }

    fn pick_services(&mut self, context: &mut ShellContext) -> Result<(), CommandError> {
        let filter = match prompts::text_input("Filter services (blank shows all)", None)? {
            TextPromptResult::Value(value) => value,
            TextPromptResult::Keep => String::new(),
            TextPromptResult::Back | TextPromptResult::Cancel => return Ok(()),
        };
        let options: Vec<(String, String)> = catalog::search_services(&filter)
            .into_iter()
            .flat_map(|(category, services)| {
                services
                    .into_iter()
                    .map(move |service| (service.to_string(), category.label.to_string()))
            })
            .collect();
        if options.is_empty() {
            self.notice(
                MessageKind::Warning,
                format!("No services match `{}`.", filter.trim()),
            );
            return Ok(());
        }
        self.toggle_loop(context, Collection::Services, options, true)
    }

    fn pick_skills(&mut self, context: &mut ShellContext) -> Result<(), CommandError> {
        let mut options: Vec<(String, String)> = AVAILABLE_SKILLS
            .iter()
            .map(|skill| (skill.to_string(), String::new()))
            .collect();
        // Keep custom skills entered from a script visible and removable.
        for label in fields::selected_labels(context.active_step_mut()?, Collection::Skills) {
            if !options.iter().any(|(option, _)| *option == label) {
                options.push((label, "custom".to_string()));
            }
        }
        self.toggle_loop(context, Collection::Skills, options, false)
    }

    fn toggle_loop(
        &mut self,
        context: &mut ShellContext,
        list: Collection,
        options: Vec<(String, String)>,
        offer_select_all: bool,
    ) -> Result<(), CommandError> {
        let formatter = Formatter::new();
        let mut cursor = 0;
        loop {
            let selected = fields::selected_labels(context.active_step_mut()?, list);
            let mut items: Vec<MenuUIItem> = options
                .iter()
                .map(|(label, description)| {
                    let checked = selected.iter().any(|chosen| chosen == label);
                    MenuUIItem::new(
                        label.clone(),
                        format!("{} {}", formatter.checkbox(checked), label),
                        description.clone(),
                    )
                })
                .collect();
            if offer_select_all {
                items.push(MenuUIItem::new(ALL_KEY, "Select all shown", ""));
            }
            items.push(MenuUIItem::new(CLEAR_KEY, "Clear all", ""));
            items.push(MenuUIItem::new(DONE_KEY, "Done", ""));

            let title = format!("{} ({} selected)", fields::field_label(list.field()), selected.len());
            let menu = MenuUI::new(title, items).with_initial_index(cursor);
            let Some(key) = self.show(menu)? else {
                return Ok(());
            };

            match key.as_str() {
                DONE_KEY => return Ok(()),
                CLEAR_KEY => fields::clear_list(context.active_step_mut()?, list)?,
                ALL_KEY => {
                    let active = context.active_step_mut()?;
                    for (label, _) in &options {
                        fields::add_label(active, list, label)?;
                    }
                }
                label => {
                    cursor = options
                        .iter()
                        .position(|(option, _)| option == label)
                        .unwrap_or(0);
                    fields::toggle_label(context.active_step_mut()?, list, label)?;
                }
            }
        }
    }

    fn review(&mut self, context: &mut ShellContext) -> Result<LoopControl, CommandError> {
        let plain = current_preferences().plain_mode;
        let summary = context.review.summary(&context.store);
        let lines = self.with_notices(render::review_screen(
            &summary,
            context.review.state(),
            plain,
        ));

        if matches!(context.review.state(), ReviewState::Submitted(_)) {
            let items = vec![
                MenuUIItem::new("start-over", "Start Over", "Clear the form for a new application"),
                MenuUIItem::new("exit", "Exit", "Leave the wizard"),
            ];
            let menu = MenuUI::new("Application submitted", items).with_context(lines.join("\n"));
            return match self.show(menu)?.as_deref() {
                Some("start-over") => {
                    context.start_over()?;
                    Ok(LoopControl::Continue)
                }
                _ => Ok(LoopControl::Exit),
            };
        }

        let submit_label = match context.review.state() {
            ReviewState::Failed(_) => "Try again",
            _ => "Submit",
        };
        let mut items = vec![MenuUIItem::new(
            "submit",
            submit_label,
            "Send the application",
        )];
        items.extend(Section::ALL.into_iter().map(|section| {
            MenuUIItem::new(
                section.step().to_string(),
                format!("Edit {}", section.title()),
                format!("Step {}", section.step()),
            )
        }));
        items.push(MenuUIItem::new("back", "Back", "Return to Preferences"));
        items.push(MenuUIItem::new("exit", "Exit", "Leave the wizard"));

        let menu = MenuUI::new("Review", items).with_context(lines.join("\n"));
        match self.show(menu)?.as_deref() {
            Some("submit") => {
                let receipt = context.submit()?;
                self.notice(
                    MessageKind::Success,
                    format!("Application submitted. Reference: {}", receipt.id),
                );
            }
            Some("exit") => return self.exit_requested(context),
            Some("back") | None => {
                context.back();
            }
            Some(step) => context.navigate(Route::Step(sequencer::clamp_str(step))),
        }
        Ok(LoopControl::Continue)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn text_value(label: &str, current: &str) -> Result<Option<String>, CommandError> {
    Ok(match prompts::text_input(label, Some(current))? {
        TextPromptResult::Value(value) => Some(value),
        TextPromptResult::Keep | TextPromptResult::Back | TextPromptResult::Cancel => None,
    })
}

fn choice_value<'a>(
    label: &str,
    options: impl IntoIterator<Item = &'a str>,
    current: &str,
) -> Result<Option<String>, CommandError> {
    let options: Vec<String> = options.into_iter().map(str::to_string).collect();
    let default = (!current.is_empty()).then_some(current);
    Ok(
        match prompts::choice_menu(label, &[], &options, default, true)? {
            ChoicePromptResult::Value(value) => Some(value),
            ChoicePromptResult::Back | ChoicePromptResult::Cancel => None,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::test_context;
    use crate::cli::ui::test_mode::{self, MenuTestEvent, TextTestInput};
    use std::sync::Mutex;

    use MenuTestEvent::{Down, Enter, Esc};

    // Scripted input queues are process-wide.
    static SERIAL: Mutex<()> = Mutex::new(());

    fn run_with(menus: Vec<Vec<MenuTestEvent>>, texts: Vec<TextTestInput>) -> ShellContext {
        let _guard = SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        test_mode::install_menu_events(menus);
        test_mode::install_text_inputs(texts);
        let mut context = test_context();
        Wizard::new().run(&mut context).expect("wizard runs");
        test_mode::reset();
        context
    }

    const EXIT_FROM_STEP: [MenuTestEvent; 4] = [Down, Down, Down, Enter];

    #[test]
    fn basic_info_is_saved_through_menus() {
        let context = run_with(
            vec![
                vec![Enter],            // Welcome: Start
                vec![Down, Enter],      // step menu: Edit fields
                vec![Enter],            // field: Full Name
                vec![Down, Enter],      // field: Email
                vec![Down, Enter],      // field: Role
                vec![Enter],            // role: Developer
                vec![Esc],              // leave the field list
                vec![Enter],            // step menu: Continue
                EXIT_FROM_STEP.to_vec(), // step 2 menu: Exit
            ],
            vec![
                TextTestInput::Value("Ada Lovelace".into()),
                TextTestInput::Value("ada@example.com".into()),
            ],
        );
        assert!(context.store.is_step_complete(StepNumber::BASIC_INFO));
        assert_eq!(context.store.answers().full_name, "Ada Lovelace");
        assert_eq!(context.store.answers().role, Some(Role::Developer));
        assert_eq!(context.route, Route::Step(StepNumber::SCHEDULE));
    }

    #[test]
    fn rejected_step_keeps_the_user_in_place() {
        let context = run_with(
            vec![
                vec![Enter],            // Welcome: Start
                vec![Enter],            // step menu: Continue with empty fields
                EXIT_FROM_STEP.to_vec(),
            ],
            Vec::new(),
        );
        assert!(!context.store.is_step_complete(StepNumber::BASIC_INFO));
        assert_eq!(context.route, Route::Step(StepNumber::BASIC_INFO));
        assert_eq!(
            context.active_step.as_ref().map(|active| active.errors().len()),
            Some(3)
        );
    }

    #[test]
    fn exhausted_script_unwinds_to_the_entry_screen() {
        let context = run_with(vec![vec![Enter]], Vec::new());
        assert_eq!(context.route, Route::Entry);
        assert!(!context.running);
    }

    #[test]
    fn past_dates_are_refused_by_the_prompt() {
        let _guard = SERIAL.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut context = test_context();
        context.navigate(Route::Step(StepNumber::SCHEDULE));
        test_mode::install_text_inputs(vec![TextTestInput::Value("2001-01-01".into())]);
        let mut wizard = Wizard::new();
        wizard
            .prompt_field(&mut context, names::PREFERRED_DATE)
            .expect("prompt runs");
        test_mode::reset();

        assert_eq!(wizard.notices.len(), 1);
        let active = context.active_step.as_ref().expect("on step");
        assert_eq!(fields::draft_value(active, names::PREFERRED_DATE), "");
    }
}
