//! Diagnostics and the per-operation result type.

use serde::{Deserialize, Serialize};

use crate::model::FileDownloaderModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Structured message returned to the caller instead of failing the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Why Read dropped a resource from tracked state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    /// The file at `filename` no longer exists.
    FileMissing,
    /// Fetched or on-disk content no longer hashes to the recorded `id`.
    Drifted,
}

/// Result of one lifecycle operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// New state to persist.
    Ok(FileDownloaderModel),
    /// State to persist, plus a non-fatal warning.
    Warning(FileDownloaderModel, Diagnostic),
    /// Caller should forget the resource (Read only).
    Removed(RemovalReason),
    /// Hard failure; nothing to persist.
    Error(Diagnostic),
}
