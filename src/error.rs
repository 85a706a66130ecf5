//! Editor-wide error type, grepable error codes, and the user-visible notice
//! built from them.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde::Serialize;

use crate::config::ConfigError;
use crate::export::ExportError;
use crate::wizard::WizardError;

// =============================================================================
// ERROR CODES
// =============================================================================

/// Grepable error code and retryable flag for user-visible notices.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error("unknown template: {0}")]
    UnknownTemplate(String),
    #[error("choose a template before inserting a photo")]
    PhotoWithoutTemplate,
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ErrorCode for EditorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Wizard(e) => e.error_code(),
            Self::UnknownTemplate(_) => "E_UNKNOWN_TEMPLATE",
            Self::PhotoWithoutTemplate => "E_TEMPLATE_REQUIRED",
            Self::Export(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Export(e) if e.retryable())
    }
}

// =============================================================================
// NOTICE
// =============================================================================

/// A message the host shows to the user. Never fatal; the editor keeps its
/// state when one is raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
}

impl Notice {
    /// Build a notice from a typed error.
    #[must_use]
    pub fn from_error(err: &(impl ErrorCode + ?Sized)) -> Self {
        Self { code: err.error_code(), message: err.to_string(), retryable: err.retryable() }
    }
}
