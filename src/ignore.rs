use crate::plugin::PluginRecord;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Plugins excluded from the audit, keyed by `<manufacturer>-<name>`.
#[derive(Debug, Default, Clone)]
pub struct IgnoreList {
    keys: HashSet<String>,
}

impl IgnoreList {
    /// Loads a JSON array of ignore keys.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read ignore list: {:?}", path))?;
        let keys: Vec<String> = serde_json::from_str(&content)
            .context(format!("Invalid ignore list: {:?}", path))?;

        Ok(keys.into_iter().collect())
    }

    pub fn contains(&self, record: &PluginRecord) -> bool {
        self.keys.contains(&record.ignore_key())
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoreList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}
