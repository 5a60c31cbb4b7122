//! The optional RON configuration of the `interlink` binary.

use crate::Error;
use interlink_core::{Catalog, query::DEFAULT_DETACH_EXCLUDE_IDS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The config file read when no `--config` is given, if present.
pub const DEFAULT_PATH: &str = "interlink.ron";

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// The log filter used unless `RUST_LOG` is set.
    pub log_level: String,
    /// Collections never collapsed by `tree --detach`.
    pub detach_exclude_ids: Vec<String>,
    /// Pretty print JSON output.
    pub pretty: bool,
    /// Replaces the standard catalog when given.
    pub catalog: Option<Catalog>,
}

impl Config {
    /// Load the config at `path`, or at [`DEFAULT_PATH`] if it exists.
    ///
    /// Falls back to the default config when no path is given and no
    /// default file exists.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(DEFAULT_PATH);
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };
        let s = std::fs::read_to_string(&path).map_err(|source| Error::Io {
            path: path.clone(),
            source,
        })?;
        let config = ron::from_str(&s)?;
        Ok(config)
    }

    /// The standard catalog unless the config replaces it.
    pub fn catalog(&self) -> &Catalog {
        self.catalog.as_ref().unwrap_or_else(|| Catalog::standard())
    }

    /// The exclusions to pass to `detach_single_child_collections`.
    pub fn detach_exclude_ids(&self) -> Vec<&str> {
        self.detach_exclude_ids.iter().map(String::as_str).collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: "info".to_string(),
            detach_exclude_ids: DEFAULT_DETACH_EXCLUDE_IDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            pretty: true,
            catalog: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let config: Config = ron::from_str("(pretty: false)").unwrap();
        assert!(!config.pretty);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.detach_exclude_ids(), DEFAULT_DETACH_EXCLUDE_IDS);
        assert!(std::ptr::eq(config.catalog(), Catalog::standard()));
    }

    #[test]
    fn test_catalog_override() {
        let config: Config =
            ron::from_str(r#"(catalog: Some((eventsByWidgetType: {"table": []})))"#).unwrap();
        let catalog = config.catalog();
        assert!(catalog.events("table").is_empty());
        // Omitted tables keep their standard contents.
        assert!(!catalog.targets("layer").is_empty());
    }
}
