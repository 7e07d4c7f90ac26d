use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::Deserialize;
use serde::Serialize;

use crate::error::LintError;
use crate::error::LintResult;

/// File looked up in the registry root when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "agentlint.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    pub layout: LayoutConfig,
    pub recommended_files: Vec<RecommendedFile>,
    pub output: OutputConfig,
}

/// Names of the files every agent directory must contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub entry_point: String,
    pub initializer: String,
    pub metadata: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedFile {
    /// Path relative to the agent directory, `/`-separated.
    pub path: String,
    #[serde(default = "default_note")]
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color: ColorMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            recommended_files: vec![
                RecommendedFile::new("README.md", "highly recommended"),
                RecommendedFile::new("config/llm.py", "recommended"),
                RecommendedFile::new("prompt/prompt.py", "recommended"),
            ],
            output: OutputConfig::default(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            entry_point: "agent.py".to_string(),
            initializer: "__init__.py".to_string(),
            metadata: "metadata.json".to_string(),
        }
    }
}

impl LayoutConfig {
    /// Module name the initializer is expected to import, i.e. the entry
    /// point's file name without its extension.
    pub fn entry_module(&self) -> &str {
        Path::new(&self.entry_point)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(&self.entry_point)
    }
}

impl RecommendedFile {
    pub fn new(path: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            note: note.into(),
        }
    }
}

fn default_note() -> String {
    "recommended".to_string()
}

impl LintConfig {
    /// Load configuration for a run over `agents_dir`.
    ///
    /// An explicit path must exist. Without one, `agentlint.yaml` in the
    /// registry root is used when present, and the built-in defaults
    /// otherwise. Environment overrides are applied last.
    pub fn load(explicit: Option<&Path>, agents_dir: &Path) -> LintResult<Self> {
        let config_file = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let candidate = agents_dir.join(CONFIG_FILE_NAME);
                candidate.is_file().then_some(candidate)
            }
        };

        let mut config = match config_file {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        config.merge_env_vars();
        Ok(config)
    }

    fn from_file(path: &Path) -> LintResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| LintError::io(path, e))?;
        tracing::debug!(path = %path.display(), "loading config");
        Self::from_yaml(&contents).map_err(|source| LintError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(contents: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserializes to unit, not a mapping.
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }

    /// Merge environment variables into configuration
    fn merge_env_vars(&mut self) {
        self.apply_env(|key| std::env::var(key).ok());
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(format) = lookup("AGENTLINT_FORMAT")
            .and_then(|value| OutputFormat::from_str(value.trim(), true).ok())
        {
            self.output.format = format;
        }

        if let Some(color) = lookup("AGENTLINT_COLOR")
            .and_then(|value| ColorMode::from_str(value.trim(), true).ok())
        {
            self.output.color = color;
        }

        // https://no-color.org: any non-empty value disables color.
        if lookup("NO_COLOR").is_some_and(|value| !value.is_empty()) {
            self.output.color = ColorMode::Never;
        }
    }
}
