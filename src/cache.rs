//! Inventory cache.
//!
//! Scanning goes through the hosting library and is slow, so the inventory
//! is snapshotted to a JSON file after the first scan. The file is trusted
//! as long as it exists; delete it to force a rescan.

use crate::plugin::Inventory;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub struct InventoryCache {
    path: PathBuf,
}

impl InventoryCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the cached inventory, or `None` when no cache file exists.
    /// A cache file that cannot be read or decoded is an error.
    pub fn load(&self) -> Result<Option<Inventory>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&self.path)
            .context(format!("Failed to read cache file: {:?}", self.path))?;
        let inventory: Inventory = serde_json::from_slice(&bytes)
            .context(format!("Corrupt cache file: {:?}", self.path))?;

        Ok(Some(inventory))
    }

    /// Overwrites the cache file with the given inventory.
    pub fn save(&self, inventory: &Inventory) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .context(format!("Failed to create cache directory: {:?}", parent))?;
            }
        }

        let content = serde_json::to_string_pretty(inventory)?;
        fs::write(&self.path, content)
            .context(format!("Failed to write cache file: {:?}", self.path))?;

        Ok(())
    }

    /// Removes the cache file so the next run rescans.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .context(format!("Failed to remove cache file: {:?}", self.path))?;
        }
        Ok(())
    }
}
