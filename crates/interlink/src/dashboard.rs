//! The dashboard document read by the `interlink` binary.

use crate::Error;
use interlink_core::{Layer, Widget};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The widgets and map layers of a dashboard.
///
/// `null` widget slots are tolerated and skipped.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Dashboard {
    pub widgets: Vec<Option<Widget>>,
    pub layers: Vec<Layer>,
}

impl Dashboard {
    /// Read a dashboard from the JSON file at `path`.
    pub fn read(path: &Path) -> Result<Self, Error> {
        let s = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let dashboard = serde_json::from_str(&s)?;
        Ok(dashboard)
    }

    /// The present widgets, in order.
    pub fn widgets(&self) -> Vec<Widget> {
        self.widgets.iter().flatten().cloned().collect()
    }
}
