//! Upsert command implementation.

use super::{company, report, CliResult, Workspace};
use registers_model::RegistersDelta;
use registers_sync::RequestContext;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Runs the upsert command.
pub fn run(
    workspace: &Workspace,
    raw_company: &str,
    delta_path: &Path,
    out: &mut impl Write,
) -> CliResult<()> {
    let company_number = company(raw_company)?;
    let body = std::fs::read(delta_path)?;
    let delta = RegistersDelta::from_json(company_number, &body)?;
    info!("Applying delta {} from {:?}", delta.delta_at, delta_path);

    let service = workspace.open_service()?;
    let outcome = service.upsert(&RequestContext::generate(), &delta);
    report(outcome, out)
}
