//! Rendering of validation results and the exit status derived from them.

use std::io;
use std::io::Write;
use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Style;
use serde::Serialize;

use crate::agent::AgentResult;

const RULE_WIDTH: usize = 80;

/// Stylesheet for console output. Plain unless [`Styles::colorize`] is called,
/// so callers decide about color explicitly.
#[derive(Debug, Default, Clone, Copy)]
pub struct Styles {
    pub success: Style,
    pub warning: Style,
    pub error: Style,
    pub info: Style,
    pub bold: Style,
    pub pass: Style,
    pub fail: Style,
}

impl Styles {
    pub fn new(color: bool) -> Self {
        let mut styles = Self::default();
        if color {
            styles.colorize();
        }
        styles
    }

    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.warning = Style::new().yellow();
        self.error = Style::new().red();
        self.info = Style::new().blue();
        self.bold = Style::new().bold();
        self.pass = Style::new().green().bold();
        self.fail = Style::new().red().bold();
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl Summary {
    pub fn from_results(results: &[AgentResult]) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed,
        }
    }
}

/// Process exit status for a run: 0 when every agent passed (including when
/// there were none), 1 otherwise.
pub fn exit_code(results: &[AgentResult]) -> u8 {
    if results.iter().all(|r| r.passed) { 0 } else { 1 }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    root: &'a Path,
    agents: &'a [AgentResult],
    summary: Summary,
}

pub fn write_json(out: &mut impl Write, root: &Path, results: &[AgentResult]) -> io::Result<()> {
    let report = JsonReport {
        root,
        agents: results,
        summary: Summary::from_results(results),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)
}

pub fn write_text(
    out: &mut impl Write,
    root: &Path,
    results: &[AgentResult],
    styles: &Styles,
) -> io::Result<()> {
    if results.is_empty() {
        let line = format!("No agent directories found in {}", root.display());
        return writeln!(out, "{}", line.style(styles.warning));
    }

    let line = format!("Validating {} agent(s) in {}", results.len(), root.display());
    writeln!(out, "{}", line.style(styles.info))?;

    writeln!(out, "\n{}", "Validation Results".style(styles.bold))?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;

    for result in results {
        write_agent(out, result, styles)?;
    }

    let summary = Summary::from_results(results);
    writeln!(out, "\n{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "{}", "Summary:".style(styles.bold))?;
    writeln!(out, "  Total agents: {}", summary.total)?;
    writeln!(
        out,
        "  {}",
        format!("Passed: {}", summary.passed).style(styles.success)
    )?;
    if summary.failed > 0 {
        writeln!(
            out,
            "  {}",
            format!("Failed: {}", summary.failed).style(styles.error)
        )?;
    }
    Ok(())
}

fn write_agent(out: &mut impl Write, result: &AgentResult, styles: &Styles) -> io::Result<()> {
    let (status, status_style) = if result.passed {
        ("[PASS]", styles.pass)
    } else {
        ("[FAIL]", styles.fail)
    };

    writeln!(out, "\n{} {}", status.style(status_style), result.name)?;
    writeln!(out, "  Path: {}", result.path.display())?;

    if !result.errors.is_empty() {
        writeln!(out, "\n  {}", "Errors:".style(styles.error))?;
        for error in &result.errors {
            writeln!(out, "    ✗ {error}")?;
        }
    }

    if !result.warnings.is_empty() {
        writeln!(out, "\n  {}", "Warnings:".style(styles.warning))?;
        for warning in &result.warnings {
            writeln!(out, "    ⚠ {warning}")?;
        }
    }
    Ok(())
}
