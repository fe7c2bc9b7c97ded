use std::fmt;

/// Destination of a resource in the generated configuration (`type.name`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetAddress {
    /// The Terraform resource type (e.g., azurerm_virtual_network)
    pub resource_type: String,
    /// The Terraform resource name (e.g., res-0)
    pub name: String,
}

impl TargetAddress {
    pub fn new(resource_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TargetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource_type, self.name)
    }
}

/// Outcome of the import step for a single resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Not processed yet
    Pending,
    /// No mapping exists, the engine was never contacted
    Skipped,
    /// Resource is now in the local state
    Imported,
    /// Import was attempted and failed
    Failed(String),
}

impl ImportOutcome {
    pub fn is_settled(&self) -> bool {
        !matches!(self, ImportOutcome::Pending)
    }
}

/// A discovered resource and what happened to it during the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    resource_id: String,
    target: Option<TargetAddress>,
    outcome: ImportOutcome,
}

impl ResourceRecord {
    /// A record that maps to a configuration address
    pub fn mapped(resource_id: impl Into<String>, target: TargetAddress) -> Self {
        Self {
            resource_id: resource_id.into(),
            target: Some(target),
            outcome: ImportOutcome::Pending,
        }
    }

    /// A record with no usable mapping; it is always skipped
    pub fn unmapped(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            target: None,
            outcome: ImportOutcome::Pending,
        }
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    pub fn mapping_present(&self) -> bool {
        self.target.is_some()
    }

    /// The configuration address, only meaningful when a mapping is present
    pub fn target(&self) -> Option<&TargetAddress> {
        self.target.as_ref()
    }

    /// The configuration address rendered for messages
    pub fn address(&self) -> String {
        self.target
            .as_ref()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "<unmapped>".to_string())
    }

    pub fn outcome(&self) -> &ImportOutcome {
        &self.outcome
    }

    /// Record the outcome of the import step.
    ///
    /// Outcomes are write-once: returns `false` and leaves the record untouched
    /// when an outcome was already recorded.
    pub fn settle(&mut self, outcome: ImportOutcome) -> bool {
        if self.outcome.is_settled() || !outcome.is_settled() {
            return false;
        }

        self.outcome = outcome;
        true
    }

    /// Error message of a failed import
    #[cfg(test)]
    pub fn import_error(&self) -> Option<&str> {
        match &self.outcome {
            ImportOutcome::Failed(cause) => Some(cause),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_address_display() {
        let address = TargetAddress::new("azurerm_resource_group", "res-0");
        assert_eq!(address.to_string(), "azurerm_resource_group.res-0");
    }

    #[test]
    fn test_new_record_is_pending() {
        let record = ResourceRecord::mapped("/a", TargetAddress::new("t", "n"));

        assert!(record.mapping_present());
        assert_eq!(record.outcome(), &ImportOutcome::Pending);
        assert_eq!(record.import_error(), None);
    }

    #[test]
    fn test_unmapped_record_address() {
        let record = ResourceRecord::unmapped("/a");

        assert!(!record.mapping_present());
        assert_eq!(record.target(), None);
        assert_eq!(record.address(), "<unmapped>");
    }

    #[test]
    fn test_outcome_is_write_once() {
        let mut record = ResourceRecord::mapped("/a", TargetAddress::new("t", "n"));

        assert!(record.settle(ImportOutcome::Failed("boom".to_string())));
        assert!(!record.settle(ImportOutcome::Imported));

        assert_eq!(record.outcome(), &ImportOutcome::Failed("boom".to_string()));
        assert_eq!(record.import_error(), Some("boom"));
    }

    #[test]
    fn test_settle_rejects_pending() {
        let mut record = ResourceRecord::unmapped("/a");

        assert!(!record.settle(ImportOutcome::Pending));
        assert!(record.settle(ImportOutcome::Skipped));
        assert!(record.outcome().is_settled());
    }
}
