use std::path::Path;
use std::path::PathBuf;

use serde::Serialize;

use crate::checks::CheckOutcome;
use crate::checks::PythonSyntax;
use crate::checks::Severity;
use crate::checks::validate_directory_name;
use crate::checks::validate_entry_point;
use crate::checks::validate_initializer;
use crate::checks::validate_metadata;
use crate::checks::validate_recommended_files;
use crate::config::LayoutConfig;
use crate::config::LintConfig;
use crate::config::RecommendedFile;
use crate::error::LintResult;
use crate::registry::AgentRegistry;

/// Validation result for one agent directory.
///
/// `passed` is true exactly when `errors` is empty. Findings keep the order
/// the checks ran in: name, metadata, entry point, initializer, recommended
/// files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentResult {
    pub name: String,
    pub path: PathBuf,
    pub passed: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl AgentResult {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            passed: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Merge one check's outcome. Findings are filed by their own severity.
    pub fn record(&mut self, outcome: CheckOutcome) {
        if !outcome.ok {
            self.passed = false;
        }
        for finding in outcome.findings {
            match finding.severity {
                Severity::Error => {
                    self.passed = false;
                    self.errors.push(finding.message);
                }
                Severity::Warning => self.warnings.push(finding.message),
            }
        }
    }
}

/// Runs every check against agent directories.
#[derive(Debug)]
pub struct Linter {
    layout: LayoutConfig,
    recommended_files: Vec<RecommendedFile>,
    syntax: PythonSyntax,
}

impl Linter {
    pub fn new(config: &LintConfig) -> Self {
        Self {
            layout: config.layout.clone(),
            recommended_files: config.recommended_files.clone(),
            syntax: PythonSyntax::new(),
        }
    }

    /// Validate a single agent directory.
    pub fn validate_agent(&self, agent_dir: &Path) -> AgentResult {
        let name = agent_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut result = AgentResult::new(&name, agent_dir);

        result.record(validate_directory_name(&name));
        result.record(validate_metadata(
            &agent_dir.join(&self.layout.metadata),
            &name,
        ));
        result.record(validate_entry_point(
            &agent_dir.join(&self.layout.entry_point),
            &self.syntax,
        ));
        result.record(validate_initializer(
            &agent_dir.join(&self.layout.initializer),
            self.layout.entry_module(),
        ));
        result.record(validate_recommended_files(
            agent_dir,
            &self.recommended_files,
        ));

        tracing::debug!(
            agent = %result.name,
            passed = result.passed,
            errors = result.errors.len(),
            warnings = result.warnings.len(),
            "validated agent"
        );
        result
    }

    /// Validate every candidate in the registry, in sorted order.
    pub fn validate_registry(&self, registry: &AgentRegistry) -> LintResult<Vec<AgentResult>> {
        let candidates = registry.candidates()?;
        Ok(candidates
            .iter()
            .map(|agent_dir| self.validate_agent(agent_dir))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::Finding;
    use pretty_assertions::assert_eq;

    #[test]
    fn record_files_findings_by_severity() {
        let mut result = AgentResult::new("weather", "/agents/weather");
        result.record(CheckOutcome {
            ok: true,
            findings: vec![
                Finding::warning("README.md is missing (highly recommended)"),
            ],
        });
        assert!(result.passed);

        result.record(CheckOutcome::failed("__init__.py is missing"));
        assert!(!result.passed);
        assert_eq!(result.errors, vec!["__init__.py is missing"]);
        assert_eq!(
            result.warnings,
            vec!["README.md is missing (highly recommended)"]
        );
    }
}
