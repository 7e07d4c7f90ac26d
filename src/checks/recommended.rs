use std::path::Path;

use super::CheckOutcome;
use crate::config::RecommendedFile;

/// Advisory check for optional supporting files. Never fails.
pub fn validate_recommended_files(agent_dir: &Path, files: &[RecommendedFile]) -> CheckOutcome {
    let mut outcome = CheckOutcome::new();
    for file in files {
        let path = file
            .path
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(agent_dir.to_path_buf(), |acc, part| acc.join(part));
        if !path.exists() {
            outcome.add_warning(format!("{} is missing ({})", file.path, file.note));
        }
    }
    outcome
}
