//! Merge a manifest's fragments and write the resolved ribbon.

use super::{prepare, print_diagnostics};
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use ribbon_config::{HidingResolver, resolve, to_json, write_xml};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Xml,
    Json,
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Path to the ribbon manifest
    #[arg(short, long, default_value = "ribbon.toml")]
    pub manifest: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Xml)]
    pub format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Abort on the first fatal error
    #[arg(long)]
    pub strict: bool,

    /// Control ids to leave out of the output (repeatable)
    #[arg(long, value_name = "ID")]
    pub hide: Vec<String>,

    /// Print diagnostics as JSON lines
    #[arg(long)]
    pub json_errors: bool,
}

pub fn execute(args: BuildArgs) -> Result<ExitCode> {
    let prepared = prepare(&args.manifest, args.strict)?;

    let output = match prepared.builder.build() {
        Ok(output) => output,
        Err(err) => {
            print_diagnostics(&[err.to_diagnostic()], &prepared.sources, args.json_errors);
            return Ok(ExitCode::FAILURE);
        }
    };
    print_diagnostics(&output.diagnostics, &prepared.sources, args.json_errors);

    let resolved = resolve(&output.model, &HidingResolver::new(&args.hide));
    let rendered = match args.format {
        OutputFormat::Xml => write_xml(&resolved).context("Failed to write ribbon XML")?,
        OutputFormat::Json => to_json(&resolved).context("Failed to write ribbon JSON")?,
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(
                "Wrote {} tabs to {}",
                resolved.tabs.len(),
                path.display()
            );
        }
        None => println!("{}", rendered),
    }

    Ok(ExitCode::SUCCESS)
}
