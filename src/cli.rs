use std::ffi::OsString;
use std::io;
use std::io::IsTerminal;
use std::io::Write;

use anyhow::Result;

use crate::agent::Linter;
use crate::config::ColorMode;
use crate::config::LintConfig;
use crate::config::OutputFormat;
use crate::registry::AgentRegistry;
use crate::report;
use crate::report::Styles;

/// Validate every agent in the registry, write the report, and return the
/// process exit status.
pub fn validate_agents(
    registry: &AgentRegistry,
    config: &LintConfig,
    color: bool,
    out: &mut impl Write,
) -> Result<u8> {
    let linter = Linter::new(config);
    let results = linter.validate_registry(registry)?;

    match config.output.format {
        OutputFormat::Text => {
            report::write_text(out, registry.root(), &results, &Styles::new(color))?;
        }
        OutputFormat::Json => report::write_json(out, registry.root(), &results)?,
    }
    out.flush()?;

    Ok(report::exit_code(&results))
}

/// Resolve the color mode once, at the edge of the program.
pub fn use_color(mode: ColorMode) -> bool {
    resolve_color(
        mode,
        io::stdout().is_terminal(),
        std::env::var_os("NO_COLOR"),
    )
}

/// `auto` colors only a terminal, and only while `NO_COLOR` is unset or empty.
fn resolve_color(mode: ColorMode, is_terminal: bool, no_color: Option<OsString>) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => is_terminal && no_color.is_none_or(|value| value.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_respects_terminal_and_no_color() {
        assert!(resolve_color(ColorMode::Auto, true, None));
        assert!(resolve_color(ColorMode::Auto, true, Some(OsString::new())));
        assert!(!resolve_color(ColorMode::Auto, true, Some("1".into())));
        assert!(!resolve_color(ColorMode::Auto, false, None));
    }

    #[test]
    fn explicit_modes_ignore_the_environment() {
        assert!(resolve_color(ColorMode::Always, false, Some("1".into())));
        assert!(!resolve_color(ColorMode::Never, true, None));
    }
}
