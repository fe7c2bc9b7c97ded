use std::fmt;

/// Terminal error of an import run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// Invalid command-line invocation, detected before any engine work
    Argument(String),

    /// The import engine could not be set up (mapping file, output dir, terraform init)
    Initialization(String),

    /// Listing the resource group's members failed
    Discovery(String),

    /// A single resource failed to import and the run is not continuing on errors
    Import {
        resource_id: String,
        address: String,
        cause: String,
    },

    /// Writing the Terraform configuration failed
    Generation(String),

    /// No quiet flag was given; only the batch path is available
    InteractiveUnavailable,
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Argument(msg) => write!(f, "{}", msg),
            RunError::Initialization(msg) => {
                write!(f, "initializing import: {}", msg)
            }
            RunError::Discovery(msg) => {
                write!(f, "listing resources: {}", msg)
            }
            RunError::Import {
                resource_id,
                address,
                cause,
            } => {
                write!(
                    f,
                    "Failed to import {} as {}: {}",
                    resource_id, address, cause
                )
            }
            RunError::Generation(msg) => {
                write!(f, "generating Terraform configuration: {}", msg)
            }
            RunError::InteractiveUnavailable => {
                write!(
                    f,
                    "interactive mode is not available, rerun with `-q` and a mapping file (`-m`)"
                )
            }
        }
    }
}

impl std::error::Error for RunError {}

/// Render an engine error with its whole context chain
pub(crate) fn describe(err: &anyhow::Error) -> String {
    format!("{:#}", err)
}

/// Result type for run operations
pub type RunResult<T> = Result<T, RunError>;

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_import_error_names_resource_address_and_cause() {
        let err = RunError::Import {
            resource_id: "/subscriptions/0/resourceGroups/rg".to_string(),
            address: "azurerm_resource_group.res-0".to_string(),
            cause: "already managed".to_string(),
        };

        assert_eq!(
            err.to_string(),
            "Failed to import /subscriptions/0/resourceGroups/rg as azurerm_resource_group.res-0: already managed"
        );
    }

    #[test]
    fn test_generation_error_has_phase_context() {
        let err = RunError::Generation("disk full".to_string());
        assert_eq!(
            err.to_string(),
            "generating Terraform configuration: disk full"
        );
    }

    #[test]
    fn test_describe_keeps_context_chain() {
        let err: anyhow::Result<()> = Err(anyhow::anyhow!("exit code 1"));
        let err = err.context("terraform init failed").unwrap_err();

        assert_eq!(describe(&err), "terraform init failed: exit code 1");
    }
}
