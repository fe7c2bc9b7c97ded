//! Import engine
//!
//! The engine owns everything that talks to the outside world during a run:
//!
//! - discovering the resources of a resource group (through `az`)
//! - importing a single resource into local Terraform state
//! - writing Terraform configuration for the imported resources
//!
//! The batch orchestrator only sees the [`ImportEngine`] trait, so tests can
//! drive it with a scripted engine.

pub mod azure;
pub mod mapping;
pub mod naming;
pub mod terraform;

use anyhow::Result;

use crate::resource::ResourceRecord;

pub use terraform::TerraformEngine;

/// Contract between the batch orchestrator and an import backend
pub trait ImportEngine {
    /// Prepare provider context and the output directory
    fn init(&mut self) -> Result<()>;

    /// All resources of the resource group, in a stable order.
    ///
    /// Records without a usable mapping are returned unmapped rather than
    /// dropped.
    fn list_resources(&mut self) -> Result<Vec<ResourceRecord>>;

    /// Import one mapped resource into the local state
    fn import(&mut self, record: &ResourceRecord) -> Result<()>;

    /// Write configuration for the record set under the output directory
    fn generate_config(&mut self, records: &[ResourceRecord]) -> Result<()>;
}
