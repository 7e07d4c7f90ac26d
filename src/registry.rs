use std::path::Path;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::error::LintError;
use crate::error::LintResult;

/// A registry root: one subdirectory per agent.
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    root: PathBuf,
}

impl AgentRegistry {
    /// Open a registry root. Fails when the root is not an existing directory.
    pub fn open(root: impl Into<PathBuf>) -> LintResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(LintError::RootNotFound(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Candidate agent directories, sorted by name.
    ///
    /// Hidden (`.`) and dunder (`__`) entries such as `__pycache__` are not
    /// agents. Plain files in the root are ignored.
    pub fn candidates(&self) -> LintResult<Vec<PathBuf>> {
        let mut agents = Vec::new();

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("failed to read directory"));
                    return Err(LintError::io(&self.root, source));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable registry entry");
                    continue;
                }
            };

            let path = entry.path();
            let name = entry.file_name().to_string_lossy();
            if !is_candidate_name(&name) {
                tracing::debug!(path = %path.display(), "skipping hidden entry");
                continue;
            }
            // Follows symlinks, so a linked agent directory still counts.
            if !path.is_dir() {
                continue;
            }
            agents.push(path.to_path_buf());
        }

        tracing::debug!(root = %self.root.display(), count = agents.len(), "discovered agents");
        Ok(agents)
    }

    /// Default registry root when none is given on the command line.
    ///
    /// Looks for an `agents` directory next to the binary, the way an
    /// installed checkout lays it out, then in the current directory.
    pub fn find_default_agents_dir() -> PathBuf {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));

        let mut candidates = Vec::new();
        if let Some(exe_dir) = &exe_dir {
            candidates.push(exe_dir.join("../agents")); // repo/bin/agentlint
            candidates.push(exe_dir.join("../../agents")); // repo/target/release/agentlint
            candidates.push(exe_dir.join("agents"));
        }
        candidates.push(PathBuf::from("agents"));

        candidates
            .iter()
            .find(|candidate| candidate.is_dir())
            .cloned()
            .unwrap_or_else(|| candidates[0].clone())
    }
}

fn is_candidate_name(name: &str) -> bool {
    !name.starts_with('.') && !name.starts_with("__")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hidden_and_dunder_names_are_skipped() {
        assert!(is_candidate_name("weather"));
        assert!(is_candidate_name("_private"));
        assert!(!is_candidate_name(".git"));
        assert!(!is_candidate_name("__pycache__"));
        assert!(!is_candidate_name("__init__.py"));
    }

    #[test]
    fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = AgentRegistry::open(dir.path().join("agents")).expect_err("missing root");
        assert!(matches!(err, LintError::RootNotFound(path) if path.ends_with("agents")));
    }

    #[test]
    fn candidates_are_sorted_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        for name in ["zeta", "alpha", ".hidden", "__pycache__", "mid"] {
            std::fs::create_dir(dir.path().join(name)).expect("mkdir");
        }
        std::fs::write(dir.path().join("pyproject.toml"), "").expect("write");

        let registry = AgentRegistry::open(dir.path()).expect("open");
        let names: Vec<String> = registry
            .candidates()
            .expect("candidates")
            .iter()
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }
}
