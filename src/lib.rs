//! Audio plugin tag audit.
//!
//! Checks that every installed audio plugin carries exactly one category tag
//! in the DAW's tag database.
//!
//! # Pipeline
//!
//! - **Inventory** (`inventory`, `cache`): installed plugins come from the
//!   native hosting library on the first run and from `cache.json` after that
//! - **Audit** (`ignore`, `tagset`, `audit`): each plugin not on the ignore
//!   list is matched to its tagset file and classified; every warning is
//!   written to the audit log
//! - **Report** (`notify`): one desktop notification with the warning count
//!
//! Everything runs once, in order, on one thread. Per-plugin problems become
//! warnings; a corrupt cache, a malformed plugin identifier, or a failed
//! notification end the run with an error.

pub mod audit;
pub mod cache;
pub mod config;
pub mod error;
pub mod ignore;
pub mod inventory;
pub mod logging;
pub mod notify;
pub mod plugin;
pub mod quiet;
pub mod tagset;

pub use audit::{AuditOutcome, AuditReport, Auditor, Finding};
pub use cache::InventoryCache;
pub use config::AuditConfig;
pub use error::AuditError;
pub use ignore::IgnoreList;
pub use inventory::{NativeScanner, PluginSource};
pub use plugin::{Inventory, PluginRecord};

use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};

/// Returns the cached inventory, or scans with `scan` and caches the result
/// when there is no cache yet.
pub fn load_or_scan<S, F>(config: &AuditConfig, scan: F) -> Result<Inventory>
where
    S: PluginSource,
    F: FnOnce(&AuditConfig) -> Result<S>,
{
    let cache = InventoryCache::new(&config.cache_path);

    if let Some(inventory) = cache.load()? {
        info!("Found cache file, loaded {} plugins", inventory.len());
        return Ok(inventory);
    }

    info!("No cache file found, scanning plugins");
    let source = scan(config)?;
    let inventory = inventory::collect(&source)?;
    quiet::silenced(|| drop(source));
    info!("Scanned {} plugins", inventory.len());

    cache.save(&inventory)?;
    Ok(inventory)
}

/// Runs a full audit and writes the audit log. Posting the notification is
/// left to the caller.
pub fn run<S, F>(config: &AuditConfig, scan: F) -> Result<AuditReport>
where
    S: PluginSource,
    F: FnOnce(&AuditConfig) -> Result<S>,
{
    let started = chrono::Local::now();

    let inventory = load_or_scan(config, scan)?;
    let ignore = IgnoreList::load(&config.ignore_path)?;

    let file = File::create(&config.log_path)
        .context(format!("Failed to create audit log: {:?}", config.log_path))?;
    let mut log = BufWriter::new(file);

    let report = Auditor::new(ignore, &config.tag_database).audit(&inventory, &mut log)?;
    log.flush().context("Failed to write audit log")?;

    let elapsed = chrono::Local::now() - started;
    info!(
        "Audited {} plugins ({} ignored) in {} ms",
        report.plugins_scanned,
        report.ignored,
        elapsed.num_milliseconds()
    );

    Ok(report)
}
