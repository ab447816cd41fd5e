//! Shell construction, wizard navigation, and command dispatch.

use std::io;

use strsim::levenshtein;
use tracing::{debug, info, warn};

use crate::{
    config::{Config, ConfigManager},
    errors::WizardError,
    review::ReviewController,
    sequencer::{previous_of, Resolution, Route, StepNumber},
    steps::{ActiveStep, StepOutcome},
    store::{json_backend::JsonFileBackend, memory::MemoryBackend, FormStore, StateBackend},
    submission::{JsonlSubmissionLog, Receipt, SimulatedSubmission, SubmissionSink},
    utils::paths,
};

pub use crate::errors::CliError;

use super::commands::{self, CommandDefinition, CommandRegistry};
use super::io as cli_io;
use super::output::{self, OutputPreferences};
pub use super::shell_context::{CliMode, ShellContext, ShellOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    pub fn new(mode: CliMode, options: ShellOptions) -> Result<Self, CliError> {
        let base = options.base_dir.unwrap_or_else(paths::app_data_dir);

        let config_manager = if options.ephemeral {
            ConfigManager::new(paths::config_file_in(&base))
        } else {
            ConfigManager::with_base_dir(&base).map_err(WizardError::from)?
        };
        let config = config_manager.load().map_err(WizardError::from)?;
        if !options.ephemeral && !config_manager.path().exists() {
            match config_manager.save(&config) {
                Ok(()) => info!(path = %config_manager.path().display(), "wrote default config"),
                Err(err) => warn!(
                    path = %config_manager.path().display(),
                    error = %err,
                    "could not write default config"
                ),
            }
        }
        output::set_preferences(OutputPreferences::from_config(&config));

        let simulated = SimulatedSubmission::from_settings(&config.submission);
        let (backend, sink): (Box<dyn StateBackend>, Box<dyn SubmissionSink>) =
            if options.ephemeral {
                (Box::new(MemoryBackend::new()), Box::new(simulated))
            } else {
                (
                    Box::new(JsonFileBackend::new(&base, &config.storage_key)),
                    Box::new(JsonlSubmissionLog::new(
                        paths::submissions_file_in(&base),
                        Box::new(simulated),
                    )),
                )
            };

        let store = FormStore::open(backend);
        let mut context = Self::with_store(mode, config, store, sink);
        context.report_load_warning();
        info!(
            backend = %context.store.backend_description(),
            sink = %context.sink.describe(),
            "wizard session opened"
        );
        Ok(context)
    }

    /// Builds a context around an already opened store.
    pub fn with_store(
        mode: CliMode,
        config: Config,
        store: FormStore,
        sink: Box<dyn SubmissionSink>,
    ) -> Self {
        let review = ReviewController::from_config(&config);
        ShellContext {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            config,
            store,
            review,
            sink,
            route: Route::Entry,
            active_step: None,
            last_command: None,
            running: true,
        }
    }

    pub(crate) fn mode(&self) -> CliMode {
        self.mode
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    fn report_load_warning(&mut self) {
        if let Some(warning) = self.store.take_load_warning() {
            cli_io::print_warning(warning);
        }
    }

    /// Moves to `route`. Entering the step already on screen keeps its draft
    /// but re-seeds it if the stored answers changed.
    pub(crate) fn navigate(&mut self, route: Route) {
        debug!(from = %self.route, to = %route, "navigating");
        match route {
            Route::Step(step) => match self.active_step.as_mut() {
                Some(active) if active.step() == step => {
                    active.resync(&self.store);
                }
                _ => self.active_step = Some(ActiveStep::open(step, &self.store)),
            },
            Route::Entry | Route::Review => self.active_step = None,
        }
        self.route = route;
    }

    pub(crate) fn goto_path(&mut self, path: &str) -> Resolution {
        let resolution = Route::parse(path);
        if resolution.redirected {
            debug!(path, target = %resolution.route, "path redirected");
        }
        self.navigate(resolution.route);
        resolution
    }

    /// First step not yet completed, or the review once all are.
    pub(crate) fn resume_route(&self) -> Route {
        StepNumber::all()
            .find(|step| !self.store.is_step_complete(*step))
            .map(Route::Step)
            .unwrap_or(Route::Review)
    }

    pub(crate) fn active_step_mut(&mut self) -> Result<&mut ActiveStep, CommandError> {
        self.active_step.as_mut().ok_or(CommandError::NotOnStep)
    }

    pub(crate) fn confirm_step(&mut self) -> Result<StepOutcome, CommandError> {
        let active = self.active_step.as_mut().ok_or(CommandError::NotOnStep)?;
        let outcome = active.confirm(&mut self.store)?;
        if let StepOutcome::Advanced(next) = &outcome {
            self.navigate(Route::from(*next));
        }
        Ok(outcome)
    }

    /// Previous position; step one and the entry screen lead back to the entry.
    pub(crate) fn back(&mut self) -> Route {
        let target = self
            .route
            .position()
            .and_then(previous_of)
            .map(Route::from)
            .unwrap_or(Route::Entry);
        self.navigate(target);
        target
    }

    pub(crate) fn submit(&mut self) -> Result<Receipt, CommandError> {
        self.review.begin()?;
        cli_io::print_info("Submitting application...");
        let receipt = self.review.complete(&mut self.store, self.sink.as_ref())?;
        Ok(receipt)
    }

    pub(crate) fn start_over(&mut self) -> CommandResult {
        let route = self.review.start_over(&mut self.store)?;
        self.active_step = None;
        self.navigate(route);
        Ok(())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.get(command).map(|definition| definition.handler) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let command = tokens[0].to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, &tokens[0], &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let mut suggestions: Vec<_> = self
            .registry
            .names()
            .map(|key| (levenshtein(key, input), key))
            .collect();
        suggestions.sort_by_key(|(distance, _)| *distance);

        if let Some((distance, best)) = suggestions.first() {
            if *distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action("Exit the wizard? Confirmed steps stay saved.", true)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::NotOnStep => {
                self.print_error(&CommandError::NotOnStep.to_string());
                self.print_hint("Try `goto /step/1` to begin.");
                Ok(())
            }
            CommandError::Core(WizardError::Incomplete(message)) => {
                self.print_error(&format!("Cannot submit yet: {}", message));
                self.print_hint("Use `edit <step>` to finish the listed steps.");
                Ok(())
            }
            CommandError::Io(err) => Err(CliError::Io(err)),
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        cli_io::print_hint(message);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Not on a form step. Use `goto /step/<n>` first.")]
    NotOnStep,
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] WizardError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        match err {
            CommandError::Core(inner) => CliError::Core(inner),
            CommandError::Io(inner) => CliError::Io(inner),
            CommandError::InvalidArguments(message) => CliError::Input(message),
            other => CliError::Command(other.to_string()),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_context() -> ShellContext {
    let mut config = Config::default();
    config.submission.delay_ms = 0;
    config.submission.retry_backoff_ms = 0;
    let sink = Box::new(SimulatedSubmission::from_settings(&config.submission));
    ShellContext::with_store(CliMode::Script, config, FormStore::in_memory(), sink)
}

#[cfg(test)]
pub(crate) fn process_script(lines: &[&str]) -> Result<ShellContext, CliError> {
    let mut app = test_context();
    for line in lines {
        match app.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => app.report_error(err)?,
        }
    }
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        answers::{Role, WorkPreference},
        review::ReviewState,
        sequencer::Position,
    };

    const ADA: &[&str] = &[
        "goto /step/1",
        "set fullName \"Ada Lovelace\"",
        "set email ada@example.com",
        "set role developer",
        "set subscribe yes",
        "next",
    ];

    #[test]
    fn confirming_step_one_moves_to_schedule() {
        let app = process_script(ADA).expect("script runs");
        assert_eq!(app.route, Route::Step(StepNumber::SCHEDULE));
        assert!(app.store.is_step_complete(StepNumber::BASIC_INFO));
        assert_eq!(app.store.answers().role, Some(Role::Developer));
        assert!(app.store.answers().subscribe);
    }

    #[test]
    fn invalid_step_one_stays_put_with_three_errors() {
        let app = process_script(&[
            "goto /step/1",
            "set fullName Al",
            "set email not-an-email",
            "next",
        ])
        .expect("script runs");
        assert_eq!(app.route, Route::Step(StepNumber::BASIC_INFO));
        let errors = app.active_step.as_ref().expect("still on step").errors();
        assert_eq!(errors.len(), 3);
        assert!(!app.store.is_step_complete(StepNumber::BASIC_INFO));
        assert_eq!(app.store.answers().full_name, "");
    }

    #[test]
    fn out_of_range_paths_land_on_step_one() {
        let app = process_script(&["goto /step/9"]).expect("script runs");
        assert_eq!(app.route, Route::Step(StepNumber::BASIC_INFO));
        let app = process_script(&["goto /nowhere"]).expect("script runs");
        assert_eq!(app.route, Route::Entry);
    }

    #[test]
    fn back_walks_positions_and_leaves_step_one_for_entry() {
        let mut app = process_script(&["review"]).expect("script runs");
        assert_eq!(app.back(), Route::Step(StepNumber::PREFERENCES));
        app.navigate(Route::Step(StepNumber::BASIC_INFO));
        assert_eq!(app.back(), Route::Entry);
    }

    #[test]
    fn switching_work_preference_clears_home_office() {
        let app = process_script(&[
            "goto /step/5",
            "set workPreference remote",
            "set homeOfficeReady yes",
            "set workPreference on-site",
            "set relocationWillingness yes",
        ])
        .expect("script runs");
        let Some(ActiveStep::Preferences(controller)) = &app.active_step else {
            panic!("expected preferences step");
        };
        assert_eq!(
            controller.draft().work_preference(),
            Some(WorkPreference::OnSite)
        );
        assert!(!controller.draft().home_office_ready());
        assert!(controller.draft().relocation_willingness());
    }

    #[test]
    fn full_run_submits_and_start_over_clears() {
        let mut lines = ADA.to_vec();
        lines.extend([
            "set preferredDate 2031-05-17",
            "set preferredTime \"10:30 am\"",
            "set timezone UTC+01:00",
            "next",
            "add services \"UI Design\"",
            "next",
            "add skills Rust",
            "next",
            "set workPreference hybrid",
            "set termsAccepted yes",
            "next",
            "submit",
        ]);
        let mut app = process_script(&lines).expect("script runs");
        assert_eq!(app.route.position(), Some(Position::Review));
        assert!(matches!(app.review.state(), ReviewState::Submitted(_)));
        assert_eq!(app.store.answers().preferred_time, "10:30 AM");

        app.start_over().expect("start over");
        assert_eq!(app.route, Route::Entry);
        assert_eq!(app.store.completed_steps(), Vec::<StepNumber>::new());
        assert_eq!(app.resume_route(), Route::Step(StepNumber::BASIC_INFO));
    }

    #[test]
    fn unknown_commands_do_not_stop_the_script() {
        let app = process_script(&["nxet", "goto /review"]).expect("script runs");
        assert_eq!(app.route, Route::Review);
    }

    #[test]
    fn exit_stops_processing() {
        let app = process_script(&["exit", "goto /review"]).expect("script runs");
        assert_eq!(app.route, Route::Entry);
    }
}
