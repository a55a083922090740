//! Main entry point for the dictsync CLI.
//!
//! Installs the log subscriber and dispatches to the command handler.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use super::{
    args::{Arguments, Command},
    commands::{init::init, translate::translate},
    exit_status::ExitStatus,
};

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };
    init_tracing(args.verbose());

    match args.command {
        Some(Command::Translate(cmd)) => translate(cmd),
        Some(Command::Init) => init(),
        None => anyhow::bail!("No command provided. Use --help to see available commands."),
    }
}

/// Log to stderr. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,dictsync=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
