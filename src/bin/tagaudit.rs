use std::cell::Cell;

use anyhow::Context;
use log::error;
use tagaudit::notify::{self, SystemNotifier};
use tagaudit::{logging, quiet, AuditConfig, NativeScanner};

fn main() -> anyhow::Result<()> {
    let _logger = logging::init_logging()?;
    let notifier = SystemNotifier;
    let scanner_loaded = Cell::new(false);

    let dir = std::env::current_dir().context("Failed to determine working directory")?;
    let result = AuditConfig::load(&dir).and_then(|config| {
        tagaudit::run(&config, |config| {
            scanner_loaded.set(true);
            NativeScanner::load(&config.scanner_library)
        })
    });

    match result {
        Ok(report) => {
            notify::report(&report, &notifier)?;
            // The hosting library is noisy when it is torn down at exit.
            if scanner_loaded.get() {
                quiet::discard_remaining_output();
            }
            Ok(())
        }
        Err(e) => {
            error!("{:#}", e);
            notify::report_failure(&e, &notifier);
            Err(e)
        }
    }
}
