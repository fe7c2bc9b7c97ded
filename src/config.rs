use anyhow::{bail, Context, Result};
use std::path::PathBuf;

use crate::engine::naming::NamePattern;

/// Directory under the user cache dir that holds default output dirs
const CACHE_SUBDIR: &str = "rgimport";

/// Settings for a single import run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Resource group whose members are imported
    pub resource_group: String,
    /// Where Terraform state and configuration are written
    pub output_dir: PathBuf,
    /// Resource mapping file
    pub mapping_file: Option<PathBuf>,
    /// Pattern for generated resource names
    pub name_pattern: NamePattern,
    /// Append run logs here instead of stderr
    pub log_file: Option<PathBuf>,
}

impl RunConfig {
    pub fn new(
        resource_group: &str,
        output_dir: Option<PathBuf>,
        mapping_file: Option<PathBuf>,
        name_pattern: &str,
        log_file: Option<PathBuf>,
    ) -> Result<Self> {
        if resource_group.trim().is_empty() {
            bail!("resource group name must not be empty");
        }

        let output_dir = match output_dir {
            Some(dir) => dir,
            None => default_output_dir(resource_group)?,
        };

        let name_pattern = NamePattern::parse(name_pattern).context("invalid name pattern")?;

        Ok(Self {
            resource_group: resource_group.to_string(),
            output_dir,
            mapping_file,
            name_pattern,
            log_file,
        })
    }
}

/// `<user cache dir>/rgimport/<resource group>`
fn default_output_dir(resource_group: &str) -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir().context("could not determine the user cache directory")?;
    Ok(cache_dir.join(CACHE_SUBDIR).join(resource_group))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_output_dir_is_kept() {
        let config = RunConfig::new(
            "demo",
            Some(PathBuf::from("/tmp/out")),
            Some(PathBuf::from("/tmp/mapping.json")),
            "res-",
            None,
        )
        .unwrap();

        assert_eq!(config.resource_group, "demo");
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.mapping_file, Some(PathBuf::from("/tmp/mapping.json")));
        assert_eq!(config.name_pattern, NamePattern::default());
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn test_default_output_dir_is_named_after_resource_group() {
        if dirs::cache_dir().is_none() {
            return;
        }

        let config = RunConfig::new("demo-rg", None, None, "res-", None).unwrap();

        assert!(config.output_dir.ends_with("rgimport/demo-rg"));
    }

    #[test]
    fn test_rejects_empty_resource_group() {
        let err = RunConfig::new("  ", Some(PathBuf::from("/tmp")), None, "res-", None).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn test_rejects_bad_name_pattern() {
        let err = RunConfig::new("demo", Some(PathBuf::from("/tmp")), None, "9*", None).unwrap_err();
        assert_eq!(err.to_string(), "invalid name pattern");
    }
}
