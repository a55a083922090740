//! Summary and warning output for the translate command.
//!
//! Separate from the engine so `dictsync` can be used as a library without
//! printing anything.

use std::{
    io::{self, Write},
    path::Path,
};

use colored::Colorize;

use crate::core::{PairOutcome, RunSummary, Skipped};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// `<locale>/<file>` relative to the dicts directory.
pub fn pair_label(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

pub fn print_skipped(root: &Path, skipped: &Skipped) {
    print_skipped_to(root, skipped, &mut io::stderr().lock());
}

pub fn print_skipped_to<W: Write>(root: &Path, skipped: &Skipped, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} skipping {} ({})",
        "warning:".bold().yellow(),
        pair_label(root, &skipped.path),
        skipped.reason
    );
}

pub fn print_summary(root: &Path, summary: &RunSummary, dry_run: bool) {
    print_summary_to(root, summary, dry_run, &mut io::stdout().lock());
}

pub fn print_summary_to<W: Write>(
    root: &Path,
    summary: &RunSummary,
    dry_run: bool,
    writer: &mut W,
) {
    if dry_run {
        print_plan(root, summary, writer);
        return;
    }

    let requested = summary.requested_count();
    let pruned = summary.pruned_count();
    if requested == 0 && pruned == 0 {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "All catalogs are up to date ({} checked)",
                plural(summary.pairs.len(), "file")
            )
            .green()
        );
        return;
    }

    let msg = match (requested, pruned) {
        (_, 0) => format!("Translated {}", plural(requested, "key")),
        (0, _) => format!("Pruned {}", plural(pruned, "key")),
        _ => format!(
            "Translated {}, pruned {}",
            plural(requested, "key"),
            plural(pruned, "key")
        ),
    };
    let msg = format!("{} in {}", msg, plural(summary.written_count(), "file"));
    let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), msg.green());
}

fn print_plan<W: Write>(root: &Path, summary: &RunSummary, writer: &mut W) {
    let pending: Vec<&PairOutcome> = summary
        .pairs
        .iter()
        .filter(|p| !p.requested.is_empty() || !p.pruned.is_empty())
        .collect();

    if pending.is_empty() {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            "Nothing to translate".green()
        );
        return;
    }

    for pair in &pending {
        let _ = writeln!(writer, "{}", pair_label(root, &pair.path).bold());
        for key in &pair.requested {
            let _ = writeln!(writer, "  {} {}", "+".green(), key);
        }
        for key in &pair.pruned {
            let _ = writeln!(writer, "  {} {}", "-".red(), key);
        }
    }

    let _ = writeln!(
        writer,
        "\n{} {} in {}",
        "Would translate".yellow().bold(),
        plural(summary.requested_count(), "key"),
        plural(pending.len(), "file")
    );
    if summary.pruned_count() > 0 {
        let _ = writeln!(
            writer,
            "{} {}",
            "Would prune".yellow().bold(),
            plural(summary.pruned_count(), "key")
        );
    }
    let _ = writeln!(writer, "Run without {} to apply.", "--dry-run".cyan());
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
