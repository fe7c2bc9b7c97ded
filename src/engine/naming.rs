//! Auto-generated Terraform resource names
//!
//! A name pattern is literal text with an auto-incremental integer appended to
//! the end, or substituted for the last `*` when the pattern contains one.

use std::collections::{HashMap, HashSet};

use anyhow::{bail, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Valid Terraform resource type or resource name
    pub static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").unwrap();
}

/// Parsed name pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePattern {
    prefix: String,
    suffix: String,
}

impl NamePattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        let (prefix, suffix) = match pattern.rfind('*') {
            Some(idx) => (&pattern[..idx], &pattern[idx + 1..]),
            None => (pattern, ""),
        };

        let parsed = Self {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        };

        let sample = parsed.render(0);
        if !IDENTIFIER.is_match(&sample) {
            bail!(
                "name pattern {:?} produces invalid resource name {:?}",
                pattern,
                sample
            );
        }

        Ok(parsed)
    }

    pub fn render(&self, index: usize) -> String {
        format!("{}{}{}", self.prefix, index, self.suffix)
    }
}

impl Default for NamePattern {
    fn default() -> Self {
        Self {
            prefix: "res-".to_string(),
            suffix: String::new(),
        }
    }
}

/// Hands out unique names for resources without an explicit name
///
/// The counter is shared by all resource types. Names reserved by explicit
/// mappings of the same type are skipped.
#[derive(Debug)]
pub struct NameAllocator {
    pattern: NamePattern,
    next: usize,
    taken: HashMap<String, HashSet<String>>,
}

impl NameAllocator {
    pub fn new(pattern: NamePattern) -> Self {
        Self {
            pattern,
            next: 0,
            taken: HashMap::new(),
        }
    }

    /// Mark a name as used for a resource type.
    ///
    /// Returns `false` when the name was already taken.
    pub fn reserve(&mut self, resource_type: &str, name: &str) -> bool {
        self.taken
            .entry(resource_type.to_string())
            .or_default()
            .insert(name.to_string())
    }

    /// Next free name for the resource type
    pub fn allocate(&mut self, resource_type: &str) -> String {
        loop {
            let candidate = self.pattern.render(self.next);
            self.next += 1;

            if self.reserve(resource_type, &candidate) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_without_placeholder_appends_counter() {
        let pattern = NamePattern::parse("res-").unwrap();
        assert_eq!(pattern.render(0), "res-0");
        assert_eq!(pattern.render(12), "res-12");
        assert_eq!(pattern, NamePattern::default());
    }

    #[test]
    fn test_pattern_replaces_placeholder() {
        let pattern = NamePattern::parse("web-*-vm").unwrap();
        assert_eq!(pattern.render(3), "web-3-vm");
    }

    #[test]
    fn test_pattern_only_substitutes_last_placeholder() {
        // The earlier `*` stays literal, which is not a valid name
        let err = NamePattern::parse("web-*-*").unwrap_err();
        assert!(err.to_string().contains("web-*-0"));
    }

    #[test]
    fn test_pattern_rejects_invalid_identifier() {
        assert!(NamePattern::parse("").is_err());
        assert!(NamePattern::parse("*-x").is_err());
        assert!(NamePattern::parse("my res").is_err());
    }

    #[test]
    fn test_allocator_counts_across_types() {
        let mut names = NameAllocator::new(NamePattern::default());

        assert_eq!(names.allocate("azurerm_resource_group"), "res-0");
        assert_eq!(names.allocate("azurerm_virtual_network"), "res-1");
        assert_eq!(names.allocate("azurerm_virtual_network"), "res-2");
    }

    #[test]
    fn test_allocator_skips_reserved_names() {
        let mut names = NameAllocator::new(NamePattern::default());
        assert!(names.reserve("azurerm_subnet", "res-0"));
        assert!(!names.reserve("azurerm_subnet", "res-0"));

        assert_eq!(names.allocate("azurerm_subnet"), "res-1");
        // Same name under another type is fine
        assert_eq!(names.allocate("azurerm_public_ip"), "res-2");
    }
}
