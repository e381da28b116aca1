//! Delete command implementation.

use super::{company, report, CliResult, Workspace};
use registers_sync::RequestContext;
use std::io::Write;
use tracing::info;

/// Runs the delete command.
pub fn run(workspace: &Workspace, raw_company: &str, out: &mut impl Write) -> CliResult<()> {
    let company_number = company(raw_company)?;
    info!("Deleting registers for {}", company_number);

    let service = workspace.open_service()?;
    let outcome = service.delete(&RequestContext::generate(), &company_number);
    report(outcome, out)
}
