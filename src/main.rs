mod batch;
mod commands;
mod config;
mod context;
mod engine;
mod error;
mod output;
mod resource;
mod traits;

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use commands::BatchCommand;
use config::RunConfig;
use context::Context;
use error::{describe, RunError, RunResult};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter for engine diagnostics
const TRACE_ENV: &str = "RGIMPORT_TRACE";

#[derive(Parser, Debug)]
#[command(name = "rgimport")]
#[command(
    about = "Import the resources of an Azure resource group into Terraform state and configuration",
    long_about = None
)]
#[command(version, disable_version_flag = true)]
struct Cli {
    /// Name of the resource group to import
    resource_group: String,

    /// Print version
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,

    /// Output directory. Defaults to a directory under the user cache dir named after the resource group
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Resource mapping file (JSON, or YAML with a .yaml/.yml extension)
    #[arg(short = 'm', long)]
    mapping_file: Option<PathBuf>,

    /// Continue when a resource fails to import (quiet mode only)
    #[arg(short = 'k', long = "continue")]
    continue_on_error: bool,

    /// Quiet mode: import without user interaction
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Pattern of generated resource names. An auto-incremental integer is appended,
    /// or replaces the last "*" when the pattern contains one
    #[arg(short = 'p', long, default_value = "res-")]
    pattern: String,

    /// Append run logs to this file instead of stderr
    #[arg(long, env = "RGIMPORT_LOGFILE")]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Flag combinations clap cannot express on its own
    fn validate(&self) -> RunResult<()> {
        if self.quiet && self.mapping_file.is_none() {
            return Err(RunError::Argument(
                "`-q` must be used together with `-m`".to_string(),
            ));
        }

        if self.continue_on_error && !self.quiet {
            return Err(RunError::Argument(
                "`-k` must be used together with `-q`".to_string(),
            ));
        }

        Ok(())
    }
}

/// Keep dependency diagnostics silent unless explicitly requested
fn init_tracing() {
    let filter = EnvFilter::try_from_env(TRACE_ENV).unwrap_or_else(|_| EnvFilter::new("off"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> RunResult<()> {
    cli.validate()?;

    let config = RunConfig::new(
        &cli.resource_group,
        cli.output_dir,
        cli.mapping_file,
        &cli.pattern,
        cli.log_file,
    )
    .map_err(|e| RunError::Argument(describe(&e)))?;

    if !cli.quiet {
        return Err(RunError::InteractiveUnavailable);
    }

    let ctx = Context::new();
    let summary = BatchCommand::execute(&ctx, config, cli.continue_on_error)?;

    output::success(&format!("Import finished: {}", summary));
    Ok(())
}

fn main() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout and are not failures
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    if let Err(err) = run(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}
