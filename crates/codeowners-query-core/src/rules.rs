//! The ordered rule store built from a CODEOWNERS file.

use crate::cache::sha256_hex;
use crate::error::{ConfigError, PatternError};
use crate::matching::PathPattern;
use crate::parse::parse_rules;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// CODEOWNERS locations relative to the repository root, in priority order.
pub const CODEOWNERS_LOCATIONS: [&str; 3] = ["CODEOWNERS", ".github/CODEOWNERS", "docs/CODEOWNERS"];

/// Returns every candidate CODEOWNERS path for a repository, in priority order.
pub fn codeowners_candidates(repo_root: &Path) -> Vec<PathBuf> {
    CODEOWNERS_LOCATIONS
        .iter()
        .map(|location| repo_root.join(location))
        .collect()
}

/// Returns the candidate CODEOWNERS paths that exist, in priority order.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use codeowners_query_core::rules::find_codeowners_files;
///
/// let found = find_codeowners_files(Path::new("/path/to/repo"));
/// if let Some(first) = found.first() {
///     println!("Using {}", first.display());
/// }
/// ```
pub fn find_codeowners_files(repo_root: &Path) -> Vec<PathBuf> {
    codeowners_candidates(repo_root)
        .into_iter()
        .filter(|p| p.is_file())
        .collect()
}

/// A single ownership rule.
#[derive(Debug, Clone)]
pub struct Rule {
    raw: String,
    matcher: PathPattern,
    owners: Vec<String>,
    negated: bool,
    line: usize,
}

impl Rule {
    /// The pattern as written in the file, including a `!` marker.
    pub fn pattern(&self) -> &str {
        &self.raw
    }

    /// The compiled matcher (negation marker excluded).
    pub fn matcher(&self) -> &PathPattern {
        &self.matcher
    }

    /// Owner tokens as written. Ignored when the rule is a negation.
    pub fn owners(&self) -> &[String] {
        &self.owners
    }

    /// Returns true if this rule clears ownership instead of assigning it.
    pub fn is_negation(&self) -> bool {
        self.negated
    }

    /// The 1-based line in the source file.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Checks whether the rule's pattern matches a repository-relative path.
    pub fn matches(&self, path: &str) -> bool {
        self.matcher.matches(path)
    }
}

/// A rule that was dropped because its pattern failed to compile.
#[derive(Debug, Clone)]
pub struct SkippedRule {
    /// The 1-based line in the source file.
    pub line: usize,
    /// Why the pattern was rejected.
    pub error: PatternError,
}

/// The ordered rules of one CODEOWNERS file.
///
/// Built once and read-only afterwards; build a new store to pick up changes.
#[derive(Debug, Clone)]
pub struct RuleStore {
    source: PathBuf,
    extra_sources: Vec<PathBuf>,
    rules: Vec<Rule>,
    skipped: Vec<SkippedRule>,
    digest: String,
}

impl RuleStore {
    /// Builds the store from the first CODEOWNERS file found in `repo_root`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoRulesFound`] if no candidate location exists.
    pub fn build(repo_root: &Path) -> Result<Self, ConfigError> {
        Self::from_candidates(&codeowners_candidates(repo_root))
    }

    /// Builds the store from the first existing path in `candidates`.
    ///
    /// Later existing candidates are not parsed; they are remembered so the
    /// validator can report them.
    pub fn from_candidates(candidates: &[PathBuf]) -> Result<Self, ConfigError> {
        let existing: Vec<PathBuf> = candidates.iter().filter(|p| p.is_file()).cloned().collect();

        let Some((source, extra)) = existing.split_first() else {
            return Err(ConfigError::NoRulesFound {
                searched: candidates.to_vec(),
            });
        };

        if !extra.is_empty() {
            warn!(
                "Found {} CODEOWNERS files, only '{}' is used",
                existing.len(),
                source.display()
            );
        }

        info!("Loading CODEOWNERS from {}", source.display());
        let text = std::fs::read_to_string(source).map_err(|e| ConfigError::Read {
            path: source.clone(),
            source: e,
        })?;

        let mut store = Self::parse(source.clone(), &text);
        store.extra_sources = extra.to_vec();
        Ok(store)
    }

    /// Builds the store from CODEOWNERS text.
    ///
    /// Rules with invalid patterns are logged, recorded in
    /// [`skipped`](Self::skipped) and left out; parsing always continues.
    pub fn parse(source: impl Into<PathBuf>, text: &str) -> Self {
        let source = source.into();
        let mut rules = Vec::new();
        let mut skipped = Vec::new();

        for raw in parse_rules(text) {
            match PathPattern::compile(raw.pattern) {
                Ok(matcher) => rules.push(Rule {
                    raw: if raw.negated {
                        format!("!{}", raw.pattern)
                    } else {
                        raw.pattern.to_string()
                    },
                    matcher,
                    owners: raw.owners.iter().map(|o| o.to_string()).collect(),
                    negated: raw.negated,
                    line: raw.line,
                }),
                Err(error) => {
                    warn!("{}:{}: {}, skipping rule", source.display(), raw.line, error);
                    skipped.push(SkippedRule {
                        line: raw.line,
                        error,
                    });
                }
            }
        }

        debug!(
            "Built rule store from {}: {} rules, {} skipped",
            source.display(),
            rules.len(),
            skipped.len()
        );

        Self {
            source,
            extra_sources: Vec::new(),
            rules,
            skipped,
            digest: sha256_hex(text.as_bytes()),
        }
    }

    /// The file the rules were read from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// SHA-256 hex of the CODEOWNERS text the rules were parsed from.
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Other CODEOWNERS files that exist but were not parsed.
    pub fn extra_sources(&self) -> &[PathBuf] {
        &self.extra_sources
    }

    /// All rules in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rules dropped because their patterns were invalid.
    pub fn skipped(&self) -> &[SkippedRule] {
        &self.skipped
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the store holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
