//! Desktop notification of the audit result.

use crate::audit::AuditReport;
use crate::error::AuditError;
use anyhow::Result;
use log::{info, warn};
use std::process::Command;

pub const NOTIFICATION_TITLE: &str = "AU Checker";

pub trait Notifier {
    fn notify(&self, title: &str, body: &str) -> Result<()>;
}

/// Posts notifications through the operating system.
///
/// macOS goes through `osascript`; other unix desktops through
/// `notify-send`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemNotifier;

impl SystemNotifier {
    fn command(title: &str, body: &str) -> Command {
        #[cfg(target_os = "macos")]
        {
            let script = format!(
                "display notification \"{}\" with title \"{}\"",
                applescript_escape(body),
                applescript_escape(title)
            );
            let mut cmd = Command::new("osascript");
            cmd.arg("-e").arg(script);
            cmd
        }

        #[cfg(not(target_os = "macos"))]
        {
            let mut cmd = Command::new("notify-send");
            cmd.arg(title).arg(body);
            cmd
        }
    }
}

impl Notifier for SystemNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<()> {
        let output = Self::command(title, body)
            .output()
            .map_err(|e| AuditError::Notification(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AuditError::Notification(format!(
                "{} ({})",
                output.status,
                stderr.trim()
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg_attr(not(target_os = "macos"), allow(dead_code))]
fn applescript_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Posts the single end-of-run notification.
pub fn report<N: Notifier + ?Sized>(report: &AuditReport, notifier: &N) -> Result<()> {
    let body = report.summary();
    info!("{}", body);
    notifier.notify(NOTIFICATION_TITLE, &body)
}

/// Tells the operator that the run stopped on a fatal error. Delivery
/// failures are only logged since the run is already failing.
pub fn report_failure<N: Notifier + ?Sized>(error: &anyhow::Error, notifier: &N) {
    let body = format!("audit aborted: {:#}", error);
    if let Err(e) = notifier.notify(NOTIFICATION_TITLE, &body) {
        warn!("Could not post failure notification: {:#}", e);
    }
}
