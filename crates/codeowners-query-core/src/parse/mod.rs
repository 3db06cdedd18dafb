//! Line parser for CODEOWNERS files.
//!
//! Turns file text into raw rules (pattern text, owner tokens, negation flag
//! and 1-based line number). Pattern compilation happens later, in the rule
//! store, so one bad pattern never stops the rest of the file from parsing.
//!
//! # Example
//!
//! ```rust
//! use codeowners_query_core::parse::parse_rules;
//!
//! let rules = parse_rules("# owners\n*.rs @rustacean\n!vendor/**\n");
//! assert_eq!(rules.len(), 2);
//! assert_eq!(rules[0].line, 2);
//! assert!(rules[1].negated);
//! ```

mod lexer;

pub use lexer::{OwnerKind, classify_owner};

use lexer::{is_blank_line, parse_comment_line, parse_rule_components};
use log::{debug, trace};

/// One rule line before pattern compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRule<'a> {
    /// The line number in the source file (1-based).
    pub line: usize,
    /// The pattern text with any `!` marker removed.
    pub pattern: &'a str,
    /// Whether the line started with `!`.
    pub negated: bool,
    /// Owner tokens in file order.
    pub owners: Vec<&'a str>,
}

/// Parses CODEOWNERS text into raw rules, in file order.
///
/// Blank lines and comments are skipped. A line needs a pattern and at least
/// one owner, except negation lines (`!pattern`), which never carry owners
/// that matter and are accepted on their own.
pub fn parse_rules(input: &str) -> Vec<RawRule<'_>> {
    debug!("Parsing CODEOWNERS text ({} bytes)", input.len());
    let mut rules = Vec::new();

    for (idx, text) in input.lines().enumerate() {
        let line = idx + 1;

        if is_blank_line(text) || parse_comment_line(text).is_ok() {
            continue;
        }

        let Ok((_, components)) = parse_rule_components(text) else {
            trace!("Line {}: could not be tokenized, skipping", line);
            continue;
        };

        let (pattern, negated) = match components.pattern.strip_prefix('!') {
            Some(stripped) => (stripped, true),
            None => (components.pattern, false),
        };

        if pattern.is_empty() {
            debug!("Line {}: negation marker without a pattern, skipping", line);
            continue;
        }
        if !negated && components.owners.is_empty() {
            debug!("Line {}: pattern '{}' has no owners, skipping", line, pattern);
            continue;
        }

        rules.push(RawRule {
            line,
            pattern,
            negated,
            owners: components.owners,
        });
    }

    debug!("Parsed {} rules", rules.len());
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rules_in_order_with_line_numbers() {
        let rules = parse_rules("# header\n\n*.go @org/backend\nsrc/*.go @org/frontend @bob\n");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].line, 3);
        assert_eq!(rules[0].pattern, "*.go");
        assert_eq!(rules[1].line, 4);
        assert_eq!(rules[1].owners, vec!["@org/frontend", "@bob"]);
    }

    #[test]
    fn single_token_line_is_ignored() {
        let rules = parse_rules("lonely-pattern\n*.rs @owner\n");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].pattern, "*.rs");
    }

    #[test]
    fn negation_without_owners_is_kept() {
        let rules = parse_rules("docs/** @org/docs\n!docs/internal/**\n");
        assert_eq!(rules.len(), 2);
        assert!(rules[1].negated);
        assert_eq!(rules[1].pattern, "docs/internal/**");
        assert!(rules[1].owners.is_empty());
    }

    #[test]
    fn negation_with_owners_keeps_tokens() {
        let rules = parse_rules("!*.lock @ignored\n");
        assert!(rules[0].negated);
        assert_eq!(rules[0].owners, vec!["@ignored"]);
    }

    #[test]
    fn bare_negation_marker_is_ignored() {
        assert!(parse_rules("! @owner\n").is_empty());
    }

    #[test]
    fn indented_comment_is_ignored() {
        assert!(parse_rules("   # not a rule @owner\n").is_empty());
    }

    #[test]
    fn trailing_comment_is_not_an_owner() {
        let rules = parse_rules("*.js @frontend # JavaScript files\n");
        assert_eq!(rules[0].owners, vec!["@frontend"]);
    }

    #[test]
    fn crlf_line_endings() {
        let rules = parse_rules("*.rs @a\r\n*.md @b\r\n");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[1].owners, vec!["@b"]);
    }
}
