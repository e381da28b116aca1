//! Get command implementation.

use super::{company, CliError, CliResult, Workspace};
use registers_sync::RequestContext;
use std::io::Write;

/// Runs the get command.
pub fn run(workspace: &Workspace, raw_company: &str, out: &mut impl Write) -> CliResult<()> {
    let company_number = company(raw_company)?;
    let service = workspace.open_service()?;

    let document = service
        .get(&RequestContext::generate(), &company_number)
        .map_err(CliError::Unavailable)?
        .ok_or_else(|| CliError::NotFound(company_number.clone()))?;

    serde_json::to_writer_pretty(&mut *out, &document)?;
    writeln!(out)?;
    Ok(())
}
