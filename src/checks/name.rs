use once_cell::sync::Lazy;
use regex::Regex;

use super::CheckOutcome;

// Same shape as a Python identifier: a letter or underscore, then letters,
// digits or underscores.
static IDENTIFIER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{XID_Start}_]\p{XID_Continue}*$").expect("compiled identifier regex")
});

/// Whether `name` can be used as a bare module name in an import.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER_RE.is_match(name)
}

/// Check an agent directory's base name.
///
/// The identifier check and the spaces check are independent, so a name such
/// as `my agent` yields two errors.
pub fn validate_directory_name(name: &str) -> CheckOutcome {
    let mut outcome = CheckOutcome::new();

    if !is_identifier(name) {
        outcome.add_error(format!(
            "Directory name '{name}' is not a valid Python identifier \
             (use only alphanumeric characters and underscores)"
        ));
    }

    if name.contains(' ') {
        outcome.add_error(format!("Directory name '{name}' contains spaces"));
    }

    outcome
}
