pub mod commands;
pub mod core;
mod fields;
pub mod help;
pub mod io;
pub mod output;
pub mod render;
mod shell;
pub mod shell_context;
pub mod ui;
mod wizard;

pub use shell::{run_cli, SCRIPT_MODE_VAR};
pub use shell_context::{CliMode, ShellOptions};
