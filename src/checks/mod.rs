//! Structural checks applied to a single agent directory.
//!
//! Every check reports an ok flag plus severity-tagged findings. A check that
//! is not ok always carries at least one [`Severity::Error`] finding.

mod entry_point;
mod initializer;
mod metadata;
mod name;
mod recommended;

use std::path::Path;

use serde::Serialize;

pub use entry_point::PythonSyntax;
pub use entry_point::validate_entry_point;
pub use initializer::validate_initializer;
pub use metadata::MetadataDocument;
pub use metadata::validate_metadata;
pub use name::is_identifier;
pub use name::validate_directory_name;
pub use recommended::validate_recommended_files;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocking: the owning agent fails validation.
    Error,
    /// Advisory: surfaced, never blocking.
    Warning,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
}

impl Finding {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub ok: bool,
    pub findings: Vec<Finding>,
}

impl CheckOutcome {
    pub fn new() -> Self {
        Self {
            ok: true,
            findings: Vec::new(),
        }
    }

    /// A failed outcome with a single error, for checks that stop early.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            findings: vec![Finding::error(message)],
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.ok = false;
        self.findings.push(Finding::error(message));
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.findings.push(Finding::warning(message));
    }

    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.findings
            .iter()
            .filter(|f| f.is_error())
            .map(|f| f.message.as_str())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.findings
            .iter()
            .filter(|f| !f.is_error())
            .map(|f| f.message.as_str())
    }
}

impl Default for CheckOutcome {
    fn default() -> Self {
        Self::new()
    }
}

/// Name used for a checked file in finding messages.
fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
