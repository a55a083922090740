//! Per-pair progress output.
//!
//! A [`StatusLine`] is opened when a (locale, namespace file) pair starts
//! and closed with its result. Dropping an open line, which happens when
//! Ctrl-C cancels the run mid-pair, closes it as interrupted.

use std::{
    io::{self, Stderr, Write},
    path::{Path, PathBuf},
};

use colored::Colorize;

use super::report::{FAILURE_MARK, SUCCESS_MARK, pair_label, print_skipped};
use crate::core::{Error, PairOutcome, RunObserver, Skipped};

pub struct StatusLine<W: Write> {
    writer: W,
    open: bool,
}

impl<W: Write> StatusLine<W> {
    pub fn start(mut writer: W, label: &str) -> Self {
        let _ = write!(writer, "{} {} ", "\u{2192}".cyan(), label);
        let _ = writer.flush();
        Self { writer, open: true }
    }

    pub fn finish(mut self, detail: &str) {
        self.close(&format!("{} {}", SUCCESS_MARK.green(), detail));
    }

    pub fn fail(mut self) {
        self.close(&format!("{}", FAILURE_MARK.red()));
    }

    fn close(&mut self, text: &str) {
        if self.open {
            let _ = writeln!(self.writer, "{}", text);
            self.open = false;
        }
    }
}

impl<W: Write> Drop for StatusLine<W> {
    fn drop(&mut self) {
        self.close(&format!("{}", "interrupted".yellow()));
    }
}

/// Observer used by `dictsync translate`: one status line per pair on stderr.
pub struct Progress {
    root: PathBuf,
    dry_run: bool,
    current: Option<StatusLine<Stderr>>,
}

impl Progress {
    pub fn new(root: &Path, dry_run: bool) -> Self {
        Self {
            root: root.to_path_buf(),
            dry_run,
            current: None,
        }
    }
}

impl RunObserver for Progress {
    fn skipped(&mut self, skipped: &Skipped) {
        print_skipped(&self.root, skipped);
    }

    fn pair_started(&mut self, _locale: &str, path: &Path) {
        self.current = Some(StatusLine::start(io::stderr(), &pair_label(&self.root, path)));
    }

    fn pair_finished(&mut self, result: Result<&PairOutcome, &Error>) {
        let Some(line) = self.current.take() else {
            return;
        };
        match result {
            Ok(outcome) => line.finish(&outcome_detail(outcome, self.dry_run)),
            Err(_) => line.fail(),
        }
    }
}

fn outcome_detail(outcome: &PairOutcome, dry_run: bool) -> String {
    let (translated, pruned) = if dry_run {
        ("to translate", "to prune")
    } else {
        ("translated", "pruned")
    };

    let mut parts = Vec::new();
    if !outcome.requested.is_empty() {
        parts.push(format!("{} {}", outcome.requested.len(), translated));
    }
    if !outcome.pruned.is_empty() {
        parts.push(format!("{} {}", outcome.pruned.len(), pruned));
    }
    if parts.is_empty() {
        "up to date".to_string()
    } else {
        parts.join(", ")
    }
}
