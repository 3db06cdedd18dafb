//! Consistency checks over the loaded rules.
//!
//! The validator never fails; every finding is returned as a
//! [`ValidationIssue`]. Issues are reported in check order:
//!
//! 1. rules dropped because their pattern is invalid (errors)
//! 2. more than one CODEOWNERS file present
//! 3. `@org/team` owners the injected [`TeamChecker`] does not know
//! 4. duplicated patterns
//! 5. files in the repository without owners
//!
//! # Example
//!
//! ```rust,ignore
//! let resolver = OwnershipResolver::new(RuleStore::build(repo)?);
//! let engine = BulkQueryEngine::new(&resolver, repo);
//! let issues = Validator::new(&engine, &checker).validate().await;
//! for issue in &issues {
//!     eprintln!("{}: {}", issue.severity, issue);
//! }
//! ```

mod issue;
mod team_checker;

pub use issue::{Severity, ValidationIssue};
pub use team_checker::TeamChecker;

use crate::parse::{OwnerKind, classify_owner};
use crate::query::BulkQueryEngine;
use crate::rules::RuleStore;
use log::{debug, info, trace, warn};
use std::collections::HashMap;

/// Runs every check against one repository.
pub struct Validator<'a> {
    engine: &'a BulkQueryEngine<'a>,
    team_checker: &'a dyn TeamChecker,
}

impl<'a> Validator<'a> {
    /// Creates a validator over the engine's rules and repository.
    pub fn new(engine: &'a BulkQueryEngine<'a>, team_checker: &'a dyn TeamChecker) -> Self {
        Self {
            engine,
            team_checker,
        }
    }

    fn store(&self) -> &RuleStore {
        self.engine.resolver().store()
    }

    /// Runs all checks and returns the issues found.
    pub async fn validate(&self) -> Vec<ValidationIssue> {
        info!("Validating {}", self.store().source().display());
        let mut issues = Vec::new();

        issues.extend(self.check_invalid_patterns());
        issues.extend(self.check_multiple_files());
        issues.extend(self.check_teams().await);
        issues.extend(self.check_duplicate_patterns());
        issues.extend(self.check_unowned_files());

        info!("Validation complete: {} issue(s)", issues.len());
        issues
    }

    /// One error per rule the pattern compiler rejected.
    pub fn check_invalid_patterns(&self) -> Vec<ValidationIssue> {
        self.store()
            .skipped()
            .iter()
            .map(|skipped| {
                ValidationIssue::error(format!("{}, rule ignored", skipped.error))
                    .at_rule(skipped.line, skipped.error.pattern.clone())
            })
            .collect()
    }

    /// One warning when CODEOWNERS files exist at more than one location.
    pub fn check_multiple_files(&self) -> Vec<ValidationIssue> {
        let extra = self.store().extra_sources();
        if extra.is_empty() {
            return Vec::new();
        }

        let ignored = extra
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        vec![ValidationIssue::warning(format!(
            "multiple CODEOWNERS files found; only '{}' is used (ignored: {})",
            self.store().source().display(),
            ignored
        ))]
    }

    /// One warning per rule owner naming a team the checker reports missing.
    ///
    /// Each distinct team is looked up once. Checker failures count as
    /// "exists".
    pub async fn check_teams(&self) -> Vec<ValidationIssue> {
        let mut known: HashMap<(String, String), bool> = HashMap::new();
        let mut issues = Vec::new();

        for rule in self.store().rules() {
            for owner in rule.owners() {
                let OwnerKind::Team { org, team } = classify_owner(owner) else {
                    continue;
                };

                let key = (org.to_string(), team.to_string());
                let exists = match known.get(&key) {
                    Some(&exists) => exists,
                    None => {
                        let exists = self.lookup_team(org, team).await;
                        known.insert(key, exists);
                        exists
                    }
                };

                if !exists {
                    issues.push(
                        ValidationIssue::warning(format!(
                            "team '{}' does not exist in organization '{}'",
                            owner, org
                        ))
                        .at_rule(rule.line(), rule.pattern()),
                    );
                }
            }
        }

        debug!(
            "Team check complete: {} distinct team(s) looked up, {} missing reference(s)",
            known.len(),
            issues.len()
        );
        issues
    }

    async fn lookup_team(&self, org: &str, team: &str) -> bool {
        trace!("Checking if team @{}/{} exists", org, team);
        match self.team_checker.team_exists(org, team).await {
            Ok(exists) => exists,
            Err(e) => {
                warn!("Could not check team @{}/{}, assuming it exists: {}", org, team, e);
                true
            }
        }
    }

    /// One warning per unordered pair of rules with the same raw pattern,
    /// citing the earlier rule.
    pub fn check_duplicate_patterns(&self) -> Vec<ValidationIssue> {
        let rules = self.store().rules();
        let mut issues = Vec::new();

        for (i, earlier) in rules.iter().enumerate() {
            for later in &rules[i + 1..] {
                if earlier.pattern() == later.pattern() {
                    issues.push(
                        ValidationIssue::warning(format!(
                            "duplicate pattern '{}' (repeated on line {})",
                            earlier.pattern(),
                            later.line()
                        ))
                        .at_rule(earlier.line(), earlier.pattern()),
                    );
                }
            }
        }

        issues
    }

    /// One warning if any file in the repository has no owners.
    pub fn check_unowned_files(&self) -> Vec<ValidationIssue> {
        let unowned = self.engine.unowned_files().len();
        if unowned == 0 {
            return Vec::new();
        }
        vec![ValidationIssue::warning(format!(
            "{} file(s) have no owners",
            unowned
        ))]
    }
}
