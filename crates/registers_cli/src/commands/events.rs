//! Events command implementation.

use super::{CliResult, Workspace};
use registers_sync::read_journal;
use std::io::Write;

/// Runs the events command.
///
/// Prints one JSON event per line, oldest first. With `limit`, only the
/// most recent `limit` events are printed.
pub fn run(workspace: &Workspace, limit: Option<usize>, out: &mut impl Write) -> CliResult<()> {
    let events = read_journal(workspace.journal())?;
    let skip = limit.map_or(0, |limit| events.len().saturating_sub(limit));

    for event in events.iter().skip(skip) {
        serde_json::to_writer(&mut *out, event)?;
        writeln!(out)?;
    }
    Ok(())
}
