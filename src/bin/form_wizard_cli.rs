use std::{env, path::PathBuf, process};

use form_wizard::{
    cli::{run_cli, ShellOptions},
    init,
    utils::build_info,
};

fn main() {
    init();

    let options = match parse_args(env::args().skip(1)) {
        Ok(Some(options)) => options,
        Ok(None) => return,
        Err(message) => {
            eprintln!("Error: {message}");
            print_usage();
            process::exit(2);
        }
    };

    if let Err(err) = run_cli(options) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

/// `Ok(None)` means the arguments were fully handled (help or version).
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<ShellOptions>, String> {
    let mut options = ShellOptions::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--ephemeral" => options.ephemeral = true,
            "--home" => {
                let dir = args
                    .next()
                    .ok_or_else(|| "--home requires a directory".to_string())?;
                options.base_dir = Some(PathBuf::from(dir));
            }
            "-h" | "--help" => {
                print_usage();
                return Ok(None);
            }
            "-V" | "--version" => {
                for line in build_info::current().lines() {
                    println!("{line}");
                }
                return Ok(None);
            }
            other => return Err(format!("unknown argument `{other}`")),
        }
    }
    Ok(Some(options))
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  form_wizard_cli [--home <dir>] [--ephemeral]");
    eprintln!("  form_wizard_cli --version");
    eprintln!();
    eprintln!("Set FORM_WIZARD_CLI_SCRIPT=1 to read commands from stdin instead of menus.");
}
