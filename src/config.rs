//! Run configuration.
//!
//! All inputs and outputs live next to the tool by default. A `tagaudit.toml`
//! in the same directory may override any of them:
//!
//! ```toml
//! tag_database = "/Users/me/Music/Audio Music Apps/Databases/Tags"
//! ignore_path = "ignore.json"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "tagaudit.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditConfig {
    pub cache_path: PathBuf,
    pub ignore_path: PathBuf,
    /// Directory holding one tagset file per plugin
    pub tag_database: PathBuf,
    pub log_path: PathBuf,
    pub scanner_library: PathBuf,
}

/// Keys accepted in the config file. Relative paths are resolved against
/// the directory holding the file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    cache_path: Option<PathBuf>,
    ignore_path: Option<PathBuf>,
    tag_database: Option<PathBuf>,
    log_path: Option<PathBuf>,
    scanner_library: Option<PathBuf>,
}

/// Default location of the tag database on macOS.
fn default_tag_database() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/"))
        .join("Music/Audio Music Apps/Databases/Tags")
}

impl AuditConfig {
    /// Default configuration for a tool installed in `dir`.
    pub fn rooted_at(dir: &Path) -> Self {
        Self {
            cache_path: dir.join("cache.json"),
            ignore_path: dir.join("ignore.json"),
            tag_database: default_tag_database(),
            log_path: dir.join("log.txt"),
            scanner_library: dir.join("JUCEBinding/Builds/MacOSX/build/Debug/JUCEBinding.dylib"),
        }
    }

    /// Defaults for `dir`, overridden by `dir/tagaudit.toml` when present.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut config = Self::rooted_at(dir);
        let path = dir.join(CONFIG_FILE_NAME);

        if !path.exists() {
            return Ok(config);
        }

        let content = fs::read_to_string(&path)
            .context(format!("Failed to read config file: {:?}", path))?;
        let file: ConfigFile =
            toml::from_str(&content).context(format!("Invalid config file: {:?}", path))?;

        let resolve = |p: PathBuf| if p.is_absolute() { p } else { dir.join(p) };
        if let Some(p) = file.cache_path {
            config.cache_path = resolve(p);
        }
        if let Some(p) = file.ignore_path {
            config.ignore_path = resolve(p);
        }
        if let Some(p) = file.tag_database {
            config.tag_database = resolve(p);
        }
        if let Some(p) = file.log_path {
            config.log_path = resolve(p);
        }
        if let Some(p) = file.scanner_library {
            config.scanner_library = resolve(p);
        }

        Ok(config)
    }
}
