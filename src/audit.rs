//! The audit pass.
//!
//! Each plugin that is not ignored is classified by looking up its tagset.
//! A plugin is fine when its tagset assigns exactly one category; every
//! other outcome is a warning and gets one entry in the audit log:
//!
//! ```text
//!
//! <manufacturer> - <name> (<tagset file>) : <reason>
//! ```

use crate::error::AuditError;
use crate::ignore::IgnoreList;
use crate::plugin::{Inventory, PluginRecord};
use crate::tagset::{read_categories, tagset_file_name};
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Classification of a single plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditOutcome {
    Ok,
    MissingTagset,
    NoCategories,
    MultipleCategories(Vec<String>),
    ParseFailure(String),
    /// Anything else that went wrong while looking at this plugin
    ProcessFailure(String),
}

impl AuditOutcome {
    fn from_categories(categories: Vec<String>) -> Self {
        match categories.len() {
            0 => AuditOutcome::NoCategories,
            1 => AuditOutcome::Ok,
            _ => AuditOutcome::MultipleCategories(categories),
        }
    }

    pub fn is_warning(&self) -> bool {
        !matches!(self, AuditOutcome::Ok)
    }

    /// Log text for a warning, `None` for [`AuditOutcome::Ok`].
    pub fn reason(&self) -> Option<String> {
        match self {
            AuditOutcome::Ok => None,
            AuditOutcome::MissingTagset => Some("has no tagset".to_string()),
            AuditOutcome::NoCategories => Some("has no categories".to_string()),
            AuditOutcome::MultipleCategories(categories) => {
                let quoted: Vec<String> = categories.iter().map(|c| quote_category(c)).collect();
                Some(format!("is in: [{}]", quoted.join(", ")))
            }
            AuditOutcome::ParseFailure(cause) => Some(format!("failed to parse tagset ({})", cause)),
            AuditOutcome::ProcessFailure(cause) => Some(format!("failed to process ({})", cause)),
        }
    }
}

/// Quotes a category name: single quotes, or double quotes when the name
/// contains `'` but no `"`.
fn quote_category(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\");
    if name.contains('\'') && !name.contains('"') {
        format!("\"{}\"", escaped)
    } else {
        format!("'{}'", escaped.replace('\'', "\\'"))
    }
}

/// A plugin that produced a warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub record: PluginRecord,
    pub tagset_file: String,
    pub outcome: AuditOutcome,
}

impl Finding {
    /// The audit log entry for this finding, leading newline included.
    pub fn log_entry(&self) -> String {
        format!(
            "\n{} ({}) : {}",
            self.record,
            self.tagset_file,
            self.outcome.reason().unwrap_or_default()
        )
    }
}

/// Result of a complete audit pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditReport {
    /// Every plugin in the inventory, ignored ones included
    pub plugins_scanned: usize,
    pub ignored: usize,
    pub warnings: usize,
    pub findings: Vec<Finding>,
}

impl AuditReport {
    pub fn summary(&self) -> String {
        format!("{} warnings, {} plugins scanned", self.warnings, self.plugins_scanned)
    }
}

/// Resolves and inspects the tagset for one plugin.
///
/// Returns the tagset file name with the outcome. A malformed identifier is
/// returned as an error since no file name can be derived for it.
pub fn classify(record: &PluginRecord, tag_dir: &Path) -> Result<(String, AuditOutcome), AuditError> {
    let file_name = tagset_file_name(&record.identifier)?;
    let path = tag_dir.join(&file_name);

    let outcome = match fs::metadata(&path) {
        Ok(meta) if meta.is_file() => match read_categories(&path) {
            Ok(categories) => AuditOutcome::from_categories(categories),
            Err(AuditError::TagsetParse(cause)) => AuditOutcome::ParseFailure(cause),
            Err(e) => AuditOutcome::ProcessFailure(e.to_string()),
        },
        Ok(_) => AuditOutcome::MissingTagset,
        Err(e) if e.kind() == io::ErrorKind::NotFound => AuditOutcome::MissingTagset,
        Err(e) => AuditOutcome::ProcessFailure(e.to_string()),
    };

    Ok((file_name, outcome))
}

/// Runs the audit over an inventory against one tag database.
pub struct Auditor {
    ignore: IgnoreList,
    tag_dir: PathBuf,
}

impl Auditor {
    pub fn new(ignore: IgnoreList, tag_dir: impl Into<PathBuf>) -> Self {
        Self {
            ignore,
            tag_dir: tag_dir.into(),
        }
    }

    /// Classifies every plugin in inventory order, writing one log entry
    /// per warning.
    pub fn audit<W: Write>(&self, inventory: &Inventory, log: &mut W) -> Result<AuditReport> {
        let mut report = AuditReport {
            plugins_scanned: inventory.len(),
            ..Default::default()
        };

        for record in inventory {
            if self.ignore.contains(record) {
                debug!("{}: ignored", record);
                report.ignored += 1;
                continue;
            }

            let (tagset_file, outcome) = classify(record, &self.tag_dir)?;
            debug!("{} ({}): {:?}", record, tagset_file, outcome);

            if !outcome.is_warning() {
                continue;
            }

            let finding = Finding {
                record: record.clone(),
                tagset_file,
                outcome,
            };
            log.write_all(finding.log_entry().as_bytes())
                .context("Failed to write audit log")?;

            report.warnings += 1;
            report.findings.push(finding);
        }

        Ok(report)
    }
}
