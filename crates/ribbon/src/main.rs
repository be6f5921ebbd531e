//! Ribbon CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod manifest;

#[derive(Parser)]
#[command(name = "ribbon")]
#[command(version)]
#[command(about = "Merge plugin ribbon fragments into one ribbon", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the fragments of a manifest and write the resolved ribbon
    Build(commands::build::BuildArgs),

    /// Merge the fragments of a manifest and report diagnostics
    Check(commands::check::CheckArgs),
}

fn main() -> Result<ExitCode> {
    // Merge diagnostics are printed by the commands themselves
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ribbon=info,ribbon_config=off".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build(args) => commands::build::execute(args),
        Commands::Check(args) => commands::check::execute(args),
    }
}
