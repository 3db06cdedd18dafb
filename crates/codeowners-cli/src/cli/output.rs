//! Output formatting for the CLI.
//!
//! Human-readable and JSON formatters for ownership results and
//! validation issues.

use codeowners_query_core::{OwnershipResult, Severity, ValidationIssue};
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

/// JSON document written by `validate --json`.
#[derive(Debug, Serialize)]
pub struct JsonValidation<'a> {
    /// Number of error-severity issues.
    pub errors: usize,
    /// Number of warning-severity issues.
    pub warnings: usize,
    /// Every issue, in report order.
    pub issues: &'a [ValidationIssue],
}

impl<'a> JsonValidation<'a> {
    /// Summarizes a list of issues.
    pub fn new(issues: &'a [ValidationIssue]) -> Self {
        let errors = issues.iter().filter(|i| i.is_error()).count();
        Self {
            errors,
            warnings: issues.len() - errors,
            issues,
        }
    }

    /// Writes the JSON output to a writer.
    pub fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}

/// Writes an ownership result as a JSON object of path to owners.
pub fn write_ownership_json<W: Write>(
    writer: &mut W,
    result: &OwnershipResult,
) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(result).map_err(std::io::Error::other)?;
    writeln!(writer, "{}", json)
}

/// Output formatter for human-readable console output.
pub struct HumanOutput<W: Write> {
    writer: W,
    use_colors: bool,
}

impl<W: Write> HumanOutput<W> {
    /// Creates a new human output formatter.
    pub fn new(writer: W, use_colors: bool) -> Self {
        Self { writer, use_colors }
    }

    /// Writes one line per path, sorted by path.
    pub fn write_ownership(&mut self, result: &OwnershipResult) -> std::io::Result<()> {
        let width = result.keys().map(|p| p.chars().count()).max().unwrap_or(0);
        for (path, owners) in result {
            self.write_owners_line(path, owners, width)?;
        }
        Ok(())
    }

    /// Writes a single `path  owners` line.
    pub fn write_owners_line(
        &mut self,
        path: &str,
        owners: &[String],
        width: usize,
    ) -> std::io::Result<()> {
        if owners.is_empty() {
            let unowned = "(unowned)";
            if self.use_colors {
                writeln!(self.writer, "{:<width$}  {}", path, unowned.dimmed())
            } else {
                writeln!(self.writer, "{:<width$}  {}", path, unowned)
            }
        } else {
            let owners = owners.join(" ");
            if self.use_colors {
                writeln!(self.writer, "{:<width$}  {}", path, owners.cyan())
            } else {
                writeln!(self.writer, "{:<width$}  {}", path, owners)
            }
        }
    }

    /// Writes paths only, one per line.
    pub fn write_paths(&mut self, result: &OwnershipResult) -> std::io::Result<()> {
        for path in result.keys() {
            writeln!(self.writer, "{}", path)?;
        }
        Ok(())
    }

    /// Writes a single issue.
    pub fn write_issue(&mut self, issue: &ValidationIssue) -> std::io::Result<()> {
        let label = match issue.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN",
        };

        if self.use_colors {
            let colored_label = match issue.severity {
                Severity::Error => format!("[{}]", label).red().bold(),
                Severity::Warning => format!("[{}]", label).yellow().bold(),
            };
            writeln!(self.writer, "  {} {}", colored_label, issue)
        } else {
            writeln!(self.writer, "  [{}] {}", label, issue)
        }
    }

    /// Writes every issue followed by a summary line.
    pub fn write_validation(&mut self, issues: &[ValidationIssue]) -> std::io::Result<()> {
        for issue in issues {
            self.write_issue(issue)?;
        }
        let errors = issues.iter().filter(|i| i.is_error()).count();
        self.write_summary(errors, issues.len() - errors)
    }

    /// Writes a summary of all validation results.
    pub fn write_summary(
        &mut self,
        total_errors: usize,
        total_warnings: usize,
    ) -> std::io::Result<()> {
        writeln!(self.writer)?;

        if total_errors == 0 && total_warnings == 0 {
            let message = "✓ CODEOWNERS file is valid";
            if self.use_colors {
                writeln!(self.writer, "{}", message.green().bold())?;
            } else {
                writeln!(self.writer, "{}", message)?;
            }
        } else {
            let message = format!(
                "✗ Found {} error(s) and {} warning(s)",
                total_errors, total_warnings
            );
            if self.use_colors {
                writeln!(self.writer, "{}", message.red().bold())?;
            } else {
                writeln!(self.writer, "{}", message)?;
            }
        }

        Ok(())
    }

    /// Writes a startup error.
    pub fn write_error(&mut self, message: &str) -> std::io::Result<()> {
        if self.use_colors {
            writeln!(self.writer, "{} {}", "Error:".red().bold(), message)
        } else {
            writeln!(self.writer, "Error: {}", message)
        }
    }
}
