use std::path::PathBuf;

use thiserror::Error;

pub type LintResult<T, E = LintError> = Result<T, E>;

/// Conditions that abort a whole run. Problems with a single agent are never
/// errors of this kind; they become findings on that agent's result.
#[derive(Debug, Error)]
pub enum LintError {
    #[error("Agents directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("I/O error while reading {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path:?}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl LintError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
