//! Resource mapping file
//!
//! Maps resource IDs to Terraform addresses. The file is a JSON (or YAML, by
//! extension) object whose keys are resource IDs and whose values are either
//! `"<resource_type>.<resource_name>"` or
//! `{ "resource_type": "...", "resource_name": "..." }` with an optional name.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use super::naming::{NameAllocator, IDENTIFIER};
use crate::resource::TargetAddress;
use crate::traits::FileSystem;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Address(String),
    Detailed {
        resource_type: String,
        #[serde(default)]
        resource_name: Option<String>,
    },
}

/// Mapping file entries in file order, repeated keys included
///
/// A plain map would keep only the last of two identical keys.
struct RawMapping(Vec<(String, RawEntry)>);

impl<'de> Deserialize<'de> for RawMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RawMapping;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from resource ID to Terraform address")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, RawEntry>()? {
                    entries.push(entry);
                }
                Ok(RawMapping(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Where a single resource goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    pub resource_type: String,
    /// Explicit name, generated from the name pattern when absent
    pub resource_name: Option<String>,
}

impl MappingEntry {
    fn from_raw(resource_id: &str, raw: RawEntry) -> Result<Self> {
        let (resource_type, resource_name) = match raw {
            RawEntry::Address(address) => match address.split_once('.') {
                Some((resource_type, name)) => (resource_type.to_string(), Some(name.to_string())),
                None => bail!(
                    "mapping for {} has address {:?}, expected <resource_type>.<resource_name>",
                    resource_id,
                    address
                ),
            },
            RawEntry::Detailed {
                resource_type,
                resource_name,
            } => (resource_type, resource_name),
        };

        if !IDENTIFIER.is_match(&resource_type) {
            bail!(
                "mapping for {} has invalid resource type {:?}",
                resource_id,
                resource_type
            );
        }

        if let Some(name) = &resource_name {
            if !IDENTIFIER.is_match(name) {
                bail!(
                    "mapping for {} has invalid resource name {:?}",
                    resource_id,
                    name
                );
            }
        }

        Ok(Self {
            resource_type,
            resource_name,
        })
    }
}

/// Parsed mapping file, keyed by lowercased resource ID
#[derive(Debug, Default)]
pub struct ResourceMapping {
    entries: HashMap<String, MappingEntry>,
}

impl ResourceMapping {
    /// Read and validate a mapping file
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let content = fs
            .read_to_string(path)
            .with_context(|| format!("reading mapping file {}", path.display()))?;

        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );

        let raw: RawMapping = if is_yaml {
            serde_yaml::from_str(&content)
                .with_context(|| format!("parsing mapping file {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("parsing mapping file {}", path.display()))?
        };

        Self::from_entries(raw)
    }

    fn from_entries(raw: RawMapping) -> Result<Self> {
        let mut entries = HashMap::new();
        let mut addresses: HashMap<String, String> = HashMap::new();

        for (resource_id, raw_entry) in raw.0 {
            let key = resource_id.to_lowercase();
            if entries.contains_key(&key) {
                bail!("resource {} is mapped more than once", resource_id);
            }

            let entry = MappingEntry::from_raw(&resource_id, raw_entry)?;

            if let Some(name) = &entry.resource_name {
                let address = format!("{}.{}", entry.resource_type, name);
                if let Some(other) = addresses.insert(address.clone(), resource_id.clone()) {
                    bail!(
                        "resources {} and {} are both mapped to {}",
                        other,
                        resource_id,
                        address
                    );
                }
            }

            entries.insert(key, entry);
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Mapping for a resource ID, compared case-insensitively
    pub fn lookup(&self, resource_id: &str) -> Option<&MappingEntry> {
        self.entries.get(&resource_id.to_lowercase())
    }

    /// Claim all explicit names so generated names never collide with them
    pub fn reserve_names(&self, names: &mut NameAllocator) {
        for entry in self.entries.values() {
            if let Some(name) = &entry.resource_name {
                names.reserve(&entry.resource_type, name);
            }
        }
    }

    /// Target address of a resource, generating a name when the mapping has none
    pub fn resolve(&self, resource_id: &str, names: &mut NameAllocator) -> Option<TargetAddress> {
        let entry = self.lookup(resource_id)?;
        let name = match &entry.resource_name {
            Some(name) => name.clone(),
            None => names.allocate(&entry.resource_type),
        };

        Some(TargetAddress::new(entry.resource_type.clone(), name))
    }
}
