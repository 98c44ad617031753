use serde::{Deserialize, Serialize};
use std::fmt;

/// A single installed plugin as reported by the hosting library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginRecord {
    pub name: String,
    pub manufacturer: String,
    /// Type and code string, e.g. `AudioUnit:Effects/aufx,clu2,SNSH`
    pub identifier: String,
}

impl PluginRecord {
    pub fn new(
        name: impl Into<String>,
        manufacturer: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            manufacturer: manufacturer.into(),
            identifier: identifier.into(),
        }
    }

    /// Key used by the ignore list: `<manufacturer>-<name>`.
    pub fn ignore_key(&self) -> String {
        format!("{}-{}", self.manufacturer, self.name)
    }
}

impl fmt::Display for PluginRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.manufacturer, self.name)
    }
}

/// Installed plugins in scan order.
pub type Inventory = Vec<PluginRecord>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignore_key_joins_manufacturer_and_name() {
        let record = PluginRecord::new("ChromaVerb", "Apple", "AudioUnit:Effects/aufx,chrv,appl");
        assert_eq!(record.ignore_key(), "Apple-ChromaVerb");
        assert_eq!(record.to_string(), "Apple - ChromaVerb");
    }
}
