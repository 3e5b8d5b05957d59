//! Error type for failed health diagnostics.
//!
//! There is exactly one failure kind: something went wrong while collecting
//! the data for a health probe. It is always turned into a 500 response by
//! the responder and never reaches the hosting router.

use std::error::Error as StdError;
use std::fmt::Write as _;
use std::io;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Diagnostic collection failure.
///
/// `Display` yields only the message, which is always safe to show to the
/// prober. [`DiagnosticError::detail`] adds the source chain and is only
/// exposed outside production mode.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct DiagnosticError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl DiagnosticError {
    /// Creates an error carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error wrapping an underlying cause.
    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// The human-readable failure description.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Message followed by every cause in the `source()` chain, one per line.
    pub fn detail(&self) -> String {
        let mut detail = format!("DiagnosticError: {}", self.message);
        let mut cause = StdError::source(self);
        while let Some(err) = cause {
            let _ = write!(detail, "\n    caused by: {}", err);
            cause = err.source();
        }
        detail
    }
}

impl From<serde_json::Error> for DiagnosticError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source("Failed to serialize health payload", err)
    }
}

impl From<io::Error> for DiagnosticError {
    fn from(err: io::Error) -> Self {
        Self::with_source(err.to_string(), err)
    }
}
