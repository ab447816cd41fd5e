use std::path::PathBuf;

use crate::{
    config::Config,
    review::ReviewController,
    sequencer::Route,
    steps::ActiveStep,
    store::FormStore,
    submission::SubmissionSink,
};

use super::commands::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Startup options resolved by the binary.
#[derive(Debug, Clone, Default)]
pub struct ShellOptions {
    /// Data directory; `None` uses `FORM_WIZARD_HOME` or `~/.form_wizard`.
    pub base_dir: Option<PathBuf>,
    /// Keep answers in memory only.
    pub ephemeral: bool,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub config: Config,
    pub store: FormStore,
    pub review: ReviewController,
    pub sink: Box<dyn SubmissionSink>,
    pub route: Route,
    pub active_step: Option<ActiveStep>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn status(&self) -> String {
        format!(
            "ShellContext {{ running: {}, route: {}, last_command: {:?} }}",
            self.running, self.route, self.last_command
        )
    }
}
