//! Merge a manifest's fragments and report diagnostics only.

use super::{prepare, print_diagnostics};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Path to the ribbon manifest
    #[arg(short, long, default_value = "ribbon.toml")]
    pub manifest: PathBuf,

    /// Abort on the first fatal error
    #[arg(long)]
    pub strict: bool,

    /// Print diagnostics as JSON lines
    #[arg(long)]
    pub json_errors: bool,
}

/// Exit with failure if any diagnostic is an error.
pub fn execute(args: CheckArgs) -> Result<ExitCode> {
    let prepared = prepare(&args.manifest, args.strict)?;

    let output = match prepared.builder.build() {
        Ok(output) => output,
        Err(err) => {
            print_diagnostics(&[err.to_diagnostic()], &prepared.sources, args.json_errors);
            return Ok(ExitCode::FAILURE);
        }
    };
    print_diagnostics(&output.diagnostics, &prepared.sources, args.json_errors);

    if output.has_errors() {
        return Ok(ExitCode::FAILURE);
    }
    info!(
        "{} tabs, {} diagnostics",
        output.model.tabs().len(),
        output.diagnostics.len()
    );
    Ok(ExitCode::SUCCESS)
}
