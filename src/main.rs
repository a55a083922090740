use std::process::ExitCode;

use dictsync::cli::{Arguments, ExitStatus};

fn main() -> ExitCode {
    let args = Arguments::parse_with_default_command();

    match dictsync::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitStatus::Error.into()
        }
    }
}
