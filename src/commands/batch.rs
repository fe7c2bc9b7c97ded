use std::sync::Arc;

use crate::batch::{BatchOptions, BatchOrchestrator, RunSummary};
use crate::config::RunConfig;
use crate::context::Context;
use crate::engine::TerraformEngine;
use crate::error::{describe, RunError, RunResult};
use crate::traits::{RunLogger, WriterLogger};

/// Prefix of every line written to a log file
const LOG_FILE_PREFIX: &str = "rgimport ";

/// Handles quiet mode - imports a whole resource group without prompts
pub struct BatchCommand;

impl BatchCommand {
    /// Execute a batch import
    pub fn execute(
        ctx: &Context,
        config: RunConfig,
        continue_on_error: bool,
    ) -> RunResult<RunSummary> {
        let logger = Self::run_logger(ctx, &config)?;
        let ctx = ctx.clone().with_logger(logger);

        ctx.logger.info(&format!(
            "New import engine for resource group {}",
            config.resource_group
        ));
        let output_dir = config.output_dir.clone();
        let mut engine = TerraformEngine::new(config, ctx.clone())
            .map_err(|e| RunError::Initialization(describe(&e)))?;

        let mut orchestrator = BatchOrchestrator::new(
            &mut engine,
            ctx.logger.as_ref(),
            BatchOptions { continue_on_error },
        );
        let summary = orchestrator.run()?;

        ctx.logger.info(&format!(
            "Terraform configuration written to {}",
            output_dir.display()
        ));

        Ok(summary)
    }

    /// Logger for the run: the configured log file, or the context's logger
    fn run_logger(ctx: &Context, config: &RunConfig) -> RunResult<Arc<dyn RunLogger>> {
        let Some(path) = &config.log_file else {
            return Ok(Arc::clone(&ctx.logger));
        };

        let sink = ctx
            .fs
            .open_append(path)
            .map_err(|e| RunError::Initialization(describe(&e)))?;

        Ok(Arc::new(WriterLogger::new(sink).with_prefix(LOG_FILE_PREFIX)))
    }
}
