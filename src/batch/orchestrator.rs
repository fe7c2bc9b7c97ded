use std::fmt;

use crate::engine::ImportEngine;
use crate::error::{describe, RunError, RunResult};
use crate::resource::{ImportOutcome, ResourceRecord};
use crate::traits::RunLogger;

/// Options for a batch run
#[derive(Debug, Clone, Default)]
pub struct BatchOptions {
    /// Keep importing after a resource fails instead of aborting the run
    pub continue_on_error: bool,
}

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Uninitialized,
    Initialized,
    Discovered,
    Importing,
    /// An import failed without continue-on-error
    Aborted,
    ReadyToGenerate,
    Generated,
    GenerationFailed,
}

/// Per-outcome counts of a finished import phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub total: usize,
    pub imported: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn from_records(records: &[ResourceRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };

        for record in records {
            match record.outcome() {
                ImportOutcome::Imported => summary.imported += 1,
                ImportOutcome::Failed(_) => summary.failed += 1,
                ImportOutcome::Skipped => summary.skipped += 1,
                ImportOutcome::Pending => {}
            }
        }

        summary
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} imported, {} failed, {} skipped (of {})",
            self.imported, self.failed, self.skipped, self.total
        )
    }
}

/// Drives one non-interactive import run
///
/// The run is a single sequential pass: initialize the engine, discover the
/// resource group once, import each mapped record in discovery order, then
/// generate configuration for the whole record set. The first fatal error
/// ends the run.
pub struct BatchOrchestrator<'a> {
    engine: &'a mut dyn ImportEngine,
    logger: &'a dyn RunLogger,
    options: BatchOptions,
    phase: RunPhase,
}

impl<'a> BatchOrchestrator<'a> {
    pub fn new(
        engine: &'a mut dyn ImportEngine,
        logger: &'a dyn RunLogger,
        options: BatchOptions,
    ) -> Self {
        Self {
            engine,
            logger,
            options,
            phase: RunPhase::Uninitialized,
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    fn enter(&mut self, phase: RunPhase) {
        tracing::debug!(from = ?self.phase, to = ?phase, "run phase");
        self.phase = phase;
    }

    /// Execute the whole pipeline
    pub fn run(&mut self) -> RunResult<RunSummary> {
        self.initialize()?;

        let mut records = self.discover()?;

        self.run_import_phase(&mut records)?;

        let summary = RunSummary::from_records(&records);
        self.logger.info(&format!("Import summary: {}", summary));

        self.generate_configuration(&records)?;

        Ok(summary)
    }

    fn initialize(&mut self) -> RunResult<()> {
        self.logger.info("Initialize");

        self.engine
            .init()
            .map_err(|e| RunError::Initialization(describe(&e)))?;

        self.enter(RunPhase::Initialized);
        Ok(())
    }

    fn discover(&mut self) -> RunResult<Vec<ResourceRecord>> {
        self.logger.info("List resources");

        let records = self
            .engine
            .list_resources()
            .map_err(|e| RunError::Discovery(describe(&e)))?;

        self.enter(RunPhase::Discovered);
        Ok(records)
    }

    fn run_import_phase(&mut self, records: &mut [ResourceRecord]) -> RunResult<()> {
        self.logger.info("Import resources");
        self.enter(RunPhase::Importing);

        for record in records.iter_mut() {
            if !record.mapping_present() {
                self.logger.warn(&format!(
                    "No mapping information for resource: {}, skip it",
                    record.resource_id()
                ));
                record.settle(ImportOutcome::Skipped);
                continue;
            }

            let address = record.address();
            self.logger.info(&format!(
                "Importing {} as {}",
                record.resource_id(),
                address
            ));

            let cause = match self.engine.import(record) {
                Ok(()) => {
                    record.settle(ImportOutcome::Imported);
                    continue;
                }
                Err(e) => describe(&e),
            };

            record.settle(ImportOutcome::Failed(cause.clone()));

            let err = RunError::Import {
                resource_id: record.resource_id().to_string(),
                address,
                cause,
            };

            if !self.options.continue_on_error {
                self.enter(RunPhase::Aborted);
                return Err(err);
            }

            self.logger.error(&err.to_string());
        }

        self.enter(RunPhase::ReadyToGenerate);
        Ok(())
    }

    fn generate_configuration(&mut self, records: &[ResourceRecord]) -> RunResult<()> {
        self.logger.info("Generate Terraform configurations");

        if let Err(e) = self.engine.generate_config(records) {
            self.enter(RunPhase::GenerationFailed);
            return Err(RunError::Generation(describe(&e)));
        }

        self.enter(RunPhase::Generated);
        Ok(())
    }
}
