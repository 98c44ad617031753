//! Diagnostic logging to stderr. This is separate from the audit log file,
//! which only ever contains warnings.

use flexi_logger::{DeferredNow, Logger, LoggerHandle};
use log::Record;
use std::io::Write;

/// Environment variable holding the log specification, e.g. `debug`.
pub const LOG_ENV: &str = "TAGAUDIT_LOG";

/// Starts the logger. Keep the returned handle alive for the whole run.
pub fn init_logging() -> anyhow::Result<LoggerHandle> {
    let spec = std::env::var(LOG_ENV).unwrap_or_else(|_| "info".to_string());
    let handle = Logger::try_with_str(spec)?.format(compact_format).start()?;
    Ok(handle)
}

/// Format: "YYYY-MM-DD HH:mm:ss.fff INF message"
fn compact_format(w: &mut dyn Write, now: &mut DeferredNow, record: &Record) -> std::io::Result<()> {
    let level = match record.level() {
        log::Level::Error => "ERR",
        log::Level::Warn => "WRN",
        log::Level::Info => "INF",
        log::Level::Debug => "DBG",
        log::Level::Trace => "TRC",
    };

    write!(w, "{} {} {}", now.format("%Y-%m-%d %H:%M:%S%.3f"), level, record.args())
}
