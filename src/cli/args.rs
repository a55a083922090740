//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `translate`: Fill in missing translations for every target locale
//!   (the default: `dictsync <DICTS_PATH>` runs it)
//! - `init`: Write a default configuration file

use std::{ffi::OsString, path::PathBuf};

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::core::SelectionSpec;
use crate::translator::Provider;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Parse the process arguments, running `translate` when no subcommand
    /// is named.
    pub fn parse_with_default_command() -> Self {
        Self::parse_from(with_default_command(std::env::args_os()))
    }

    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Translate(cmd)) => cmd.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Insert `translate` after the binary name unless the first argument is
/// a subcommand or a top-level flag. An empty command line is left alone so
/// it still prints help.
pub fn with_default_command<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let Some(first) = args.get(1).and_then(|arg| arg.to_str()) else {
        return args;
    };

    let command = Arguments::command();
    let names_subcommand = first == "help"
        || command
            .get_subcommands()
            .any(|sub| sub.get_name() == first || sub.get_all_aliases().any(|a| a == first));
    let top_level_flag = matches!(first, "-h" | "--help" | "-V" | "--version");

    if !names_subcommand && !top_level_flag {
        args.insert(1, OsString::from("translate"));
    }
    args
}

#[derive(Debug, Args)]
pub struct TranslateCommand {
    /// Directory with one sub-directory per locale
    pub dicts_path: PathBuf,

    /// Source locale (overrides config file)
    #[arg(short, long)]
    pub source_language: Option<String>,

    /// Translation provider (overrides config file)
    #[arg(short, long, value_enum)]
    pub provider: Option<Provider>,

    /// Only (re)translate one key or a key prefix: `ns:path` or `ns:path*`
    #[arg(short, long, value_name = "KEY")]
    pub only: Option<SelectionSpec>,

    /// Batch size for provider requests (overrides config file)
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Remove target keys that no longer exist in the source locale
    #[arg(long)]
    pub strict: bool,

    /// Show what would be translated without calling the provider or writing files
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub anthropic_api_key: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Translate missing keys from the source locale into every other locale
    Translate(TranslateCommand),
    /// Initialize a new .dictsyncrc.json configuration file
    Init,
}
