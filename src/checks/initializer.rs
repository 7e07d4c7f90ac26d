use std::fs;
use std::path::Path;

use super::CheckOutcome;
use super::file_label;

/// Check the package initializer.
///
/// Only a missing file fails the check. The import idiom check is advisory:
/// the initializer should pull in the entry-point module via
/// `from . import <module>` or `from .<module> import ...`. If the file
/// cannot be read as text the advisory check is skipped.
pub fn validate_initializer(path: &Path, entry_module: &str) -> CheckOutcome {
    let file_name = file_label(path);

    if !path.exists() {
        return CheckOutcome::failed(format!("{file_name} is missing"));
    }

    let mut outcome = CheckOutcome::new();
    if let Some(contents) = read_text(path) {
        if !imports_module(&contents, entry_module) {
            outcome.add_warning(format!(
                "{file_name} does not import {entry_module} module (recommended)"
            ));
        }
    }
    outcome
}

fn read_text(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(contents) => Some(contents),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "skipping import check");
            None
        }
    }
}

fn imports_module(contents: &str, module: &str) -> bool {
    contents.contains(&format!("from . import {module}"))
        || contents.contains(&format!("from .{module} import"))
}
