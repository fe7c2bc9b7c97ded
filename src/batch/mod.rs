//! Non-interactive ("quiet mode") import pipeline
//!
//! Sequence of a run:
//!
//! 1. initialize the import engine
//! 2. discover the resource group once
//! 3. import each mapped resource in discovery order, skipping unmapped ones
//! 4. generate Terraform configuration over the full record set
//!
//! A failed import aborts the run unless continue-on-error is set, in which case
//! it is logged and the run goes on.

pub mod orchestrator;

pub use orchestrator::{BatchOptions, BatchOrchestrator, RunSummary};
