//! Terminal rendering of reports.
//!
//! Regular output goes to `out` (stdout in the binary); errors go to `err`.
//! Colors follow `colored`'s global switch, so tests turn them off.

use colored::{ColoredString, Colorize};
use std::io::{self, Write};

use super::{BatchReport, IssueReport, StatusLine};
use crate::reconcile::AssigneeStatus;
use crate::types::RepoId;

const INDENT: &str = "   ";

fn error_tag() -> ColoredString {
    "ERROR".red().bold()
}

fn status_symbol(status: AssigneeStatus) -> ColoredString {
    let symbol = status.symbol().to_string();
    match status {
        AssigneeStatus::Added => symbol.green().bold(),
        AssigneeStatus::Kept => symbol.blue().bold(),
        AssigneeStatus::Removed => symbol.red().bold(),
    }
}

/// Writes one issue's block.
///
/// A failed issue prints only its header on `out` and an error line on
/// `err`.
pub fn write_issue_report<W: Write, E: Write>(
    out: &mut W,
    err: &mut E,
    report: &IssueReport,
) -> io::Result<()> {
    writeln!(
        out,
        "-> {} ({})",
        report.issue_ref.as_str().bold(),
        report.url
    )?;

    if !report.ok {
        return writeln!(
            err,
            "{INDENT}{}: Could not update issue {}",
            error_tag(),
            report.issue_ref
        );
    }

    if let Some(note) = &report.fallback_note {
        writeln!(out, "{INDENT}{}: {}", "FALLBACK".yellow().bold(), note)?;
    }
    for StatusLine { status, assignee } in &report.status_lines {
        writeln!(out, "{INDENT}{} {}", status_symbol(*status), assignee)?;
    }
    Ok(())
}

/// Writes every issue block of a run, in order.
pub fn write_batch_report<W: Write, E: Write>(
    out: &mut W,
    err: &mut E,
    batch: &BatchReport,
) -> io::Result<()> {
    for report in &batch.issues {
        write_issue_report(out, err, report)?;
    }
    Ok(())
}

/// Writes the error shown when a repository's issues cannot be listed.
pub fn write_listing_failure<E: Write>(err: &mut E, repo: &RepoId) -> io::Result<()> {
    writeln!(
        err,
        "{}: Could not list issues for repository {}",
        error_tag(),
        repo
    )
}
