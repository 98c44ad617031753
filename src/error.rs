use thiserror::Error;

/// Errors raised while auditing the plugin catalog.
///
/// Only [`AuditError::TagsetParse`] is recovered per plugin; the other
/// variants end the run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// The identifier does not decompose into three type codes
    #[error("malformed plugin identifier '{identifier}': {reason}")]
    MalformedIdentifier { identifier: String, reason: String },

    /// A tagset file could not be read or lacks the expected structure
    #[error("{0}")]
    TagsetParse(String),

    /// The plugin hosting library misbehaved or could not be loaded
    #[error("plugin scanner error: {0}")]
    Scanner(String),

    /// The desktop notification could not be delivered
    #[error("notification failed: {0}")]
    Notification(String),
}
