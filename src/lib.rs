//! Structural linter for directory-based agent registries (checks, discovery, and reporting).

mod agent;
pub mod checks;
pub mod cli;
pub mod config;
mod error;
mod registry;
pub mod report;

pub use agent::AgentResult;
pub use agent::Linter;
pub use config::LintConfig;
pub use error::LintError;
pub use error::LintResult;
pub use registry::AgentRegistry;
