//! Validation issue types.

use serde::Serialize;
use std::fmt::{self, Display};

/// The severity of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// A warning that doesn't prevent ownership resolution from working.
    Warning,
    /// An error: part of the file has no effect.
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A single problem found by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// How serious the issue is.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// The CODEOWNERS line the issue refers to (1-based).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// The pattern the issue refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl ValidationIssue {
    /// Creates a warning not tied to a rule.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            line: None,
            pattern: None,
        }
    }

    /// Creates an error not tied to a rule.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            ..Self::warning(message)
        }
    }

    /// Attaches the rule's line and pattern.
    pub fn at_rule(mut self, line: usize, pattern: impl Into<String>) -> Self {
        self.line = Some(line);
        self.pattern = Some(pattern.into());
        self
    }

    /// Returns true if this is an error.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.message),
            None => f.write_str(&self.message),
        }
    }
}
