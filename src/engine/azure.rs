use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::traits::{failure_message, CommandExecutor};

/// Subset of `az group show` / `az resource list` output we rely on
#[derive(Debug, Deserialize)]
struct AzResource {
    id: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// Resource discovery through the Azure CLI
///
/// Authentication and paging are handled by `az` itself; the current `az login`
/// context selects the subscription.
pub struct AzureCli {
    command: Arc<dyn CommandExecutor>,
}

impl AzureCli {
    pub fn new(command: Arc<dyn CommandExecutor>) -> Self {
        Self { command }
    }

    /// IDs of the resource group and all of its members.
    ///
    /// The resource group comes first, members follow in the order `az`
    /// returned them.
    pub fn discover(&self, resource_group: &str) -> Result<Vec<String>> {
        let group = self.resource_group_id(resource_group)?;
        let members = self.list_members(resource_group)?;

        let mut ids = Vec::with_capacity(members.len() + 1);
        ids.push(group);
        ids.extend(members.into_iter().map(|r| r.id));
        Ok(ids)
    }

    fn resource_group_id(&self, resource_group: &str) -> Result<String> {
        let stdout = self.run(&[
            "group",
            "show",
            "--name",
            resource_group,
            "--output",
            "json",
        ])?;

        let group: AzResource = serde_json::from_str(&stdout)
            .with_context(|| format!("parsing resource group {}", resource_group))?;
        Ok(group.id)
    }

    fn list_members(&self, resource_group: &str) -> Result<Vec<AzResource>> {
        let stdout = self.run(&[
            "resource",
            "list",
            "--resource-group",
            resource_group,
            "--output",
            "json",
        ])?;

        let members: Vec<AzResource> = serde_json::from_str(&stdout)
            .with_context(|| format!("parsing resources of {}", resource_group))?;

        for member in &members {
            tracing::trace!(id = %member.id, kind = ?member.kind, "discovered");
        }

        Ok(members)
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = self.command.execute("az", args, Path::new("."))?;

        if !output.status.success() {
            bail!("az {} failed: {}", args[..2].join(" "), failure_message(&output));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
