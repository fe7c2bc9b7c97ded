use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use lazy_static::lazy_static;
use regex::Regex;

use super::azure::AzureCli;
use super::mapping::ResourceMapping;
use super::naming::NameAllocator;
use super::ImportEngine;
use crate::config::RunConfig;
use crate::context::Context;
use crate::resource::{ImportOutcome, ResourceRecord};
use crate::traits::failure_message;

/// Provider requirements written before `terraform init`
const PROVIDER_CONFIG: &str = r#"terraform {
  required_providers {
    azurerm = {
      source  = "hashicorp/azurerm"
      version = "~> 3.0"
    }
  }
}

provider "azurerm" {
  features {}
}
"#;

const PROVIDER_FILE: &str = "provider.tf";
const MAIN_FILE: &str = "main.tf";

lazy_static! {
    /// Read-only `id` attribute at the top level of a `terraform state show` block
    static ref TOP_LEVEL_ID: Regex = Regex::new(r"^ {4}id\s*=").unwrap();
}

/// Import engine backed by the Azure CLI and the Terraform CLI
pub struct TerraformEngine {
    ctx: Context,
    config: RunConfig,
    mapping: ResourceMapping,
    names: NameAllocator,
    azure: AzureCli,
}

impl TerraformEngine {
    /// Build the engine, loading and validating the mapping file
    pub fn new(config: RunConfig, ctx: Context) -> Result<Self> {
        let mapping = match &config.mapping_file {
            Some(path) => ResourceMapping::load(ctx.fs.as_ref(), path)?,
            None => ResourceMapping::default(),
        };

        let mut names = NameAllocator::new(config.name_pattern.clone());
        mapping.reserve_names(&mut names);

        let azure = AzureCli::new(ctx.command.clone());

        Ok(Self {
            ctx,
            config,
            mapping,
            names,
            azure,
        })
    }

    fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    fn ensure_empty_output_dir(&self) -> Result<()> {
        let dir = self.output_dir();

        if !self.ctx.fs.exists(dir) {
            return self.ctx.fs.create_dir_all(dir);
        }

        if !self.ctx.fs.is_dir(dir) {
            bail!("output path {} is not a directory", dir.display());
        }

        // The run's own log file may already live here
        let log_file = self.config.log_file.as_deref();
        let occupied = self
            .ctx
            .fs
            .read_dir(dir)?
            .into_iter()
            .any(|entry| Some(entry.as_path()) != log_file);

        if occupied {
            bail!("output directory {} is not empty", dir.display());
        }

        Ok(())
    }

    fn terraform(&self, args: &[&str]) -> Result<String> {
        let output = self.ctx.command.execute("terraform", args, self.output_dir())?;

        if !output.status.success() {
            bail!("{}", failure_message(&output));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn main_file(&self) -> PathBuf {
        self.output_dir().join(MAIN_FILE)
    }
}

impl ImportEngine for TerraformEngine {
    fn init(&mut self) -> Result<()> {
        self.ensure_empty_output_dir()?;

        self.ctx
            .fs
            .write(&self.output_dir().join(PROVIDER_FILE), PROVIDER_CONFIG)?;

        self.terraform(&["init", "-no-color", "-input=false"])
            .context("terraform init failed")?;

        if let Some(path) = &self.config.mapping_file {
            self.ctx.logger.info(&format!(
                "Loaded {} mapping(s) from {}",
                self.mapping.len(),
                path.display()
            ));
        }

        Ok(())
    }

    fn list_resources(&mut self) -> Result<Vec<ResourceRecord>> {
        let ids = self.azure.discover(&self.config.resource_group)?;

        let mapping = &self.mapping;
        let names = &mut self.names;

        let records = ids
            .into_iter()
            .map(|id| match mapping.resolve(&id, names) {
                Some(target) => ResourceRecord::mapped(id, target),
                None => ResourceRecord::unmapped(id),
            })
            .collect();

        Ok(records)
    }

    fn import(&mut self, record: &ResourceRecord) -> Result<()> {
        let Some(target) = record.target() else {
            bail!("resource {} has no mapping", record.resource_id());
        };

        let address = target.to_string();
        self.terraform(&[
            "import",
            "-no-color",
            "-input=false",
            &address,
            record.resource_id(),
        ])?;

        Ok(())
    }

    fn generate_config(&mut self, records: &[ResourceRecord]) -> Result<()> {
        let mut blocks = Vec::new();

        for record in records {
            if record.outcome() != &ImportOutcome::Imported {
                continue;
            }

            let address = record.address();
            let shown = self
                .terraform(&["state", "show", "-no-color", &address])
                .with_context(|| format!("terraform state show {} failed", address))?;

            blocks.push(strip_read_only(&shown));
        }

        let path = self.main_file();
        self.ctx.fs.write(&path, &blocks.join("\n"))?;
        self.ctx.logger.info(&format!(
            "Wrote {} resource block(s) to {}",
            blocks.len(),
            path.display()
        ));

        Ok(())
    }
}

/// Drop attributes Terraform rejects in configuration
fn strip_read_only(block: &str) -> String {
    let mut out = String::with_capacity(block.len());

    for line in block.lines() {
        if TOP_LEVEL_ID.is_match(line) {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }

    out
}
