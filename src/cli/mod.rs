mod args;
mod commands;
mod exit_status;
mod progress;
mod report;
mod run;

pub use args::{Arguments, Command, TranslateCommand};
pub use exit_status::ExitStatus;
pub use run::run_cli;
