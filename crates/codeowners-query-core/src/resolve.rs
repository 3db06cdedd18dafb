//! Last-match-wins ownership resolution.

use crate::rules::{Rule, RuleStore};
use log::trace;
use std::cell::RefCell;
use std::collections::HashMap;

/// Resolves the owners of repository paths against a [`RuleStore`].
///
/// Results are memoized per normalized path for the lifetime of the
/// resolver. The memo never evicts; build a new resolver to reset it.
#[derive(Debug)]
pub struct OwnershipResolver {
    store: RuleStore,
    memo: RefCell<HashMap<String, Vec<String>>>,
}

impl OwnershipResolver {
    /// Creates a resolver that takes ownership of the rule store.
    pub fn new(store: RuleStore) -> Self {
        Self {
            store,
            memo: RefCell::new(HashMap::new()),
        }
    }

    /// The rules this resolver evaluates.
    pub fn store(&self) -> &RuleStore {
        &self.store
    }

    /// Returns the rule that decides ownership of `path`, if any.
    ///
    /// Rules are scanned from the last declared to the first; the first one
    /// that matches wins.
    pub fn matching_rule(&self, path: &str) -> Option<&Rule> {
        let path = normalize_path(path);
        self.store.rules().iter().rev().find(|rule| rule.matches(&path))
    }

    /// Returns the owners of `path`.
    ///
    /// An empty list means the path is unowned, either because no rule
    /// matches or because the deciding rule is a negation.
    pub fn resolve(&self, path: &str) -> Vec<String> {
        let path = normalize_path(path);

        if let Some(owners) = self.memo.borrow().get(&path) {
            trace!("Resolved '{}' from memo", path);
            return owners.clone();
        }

        let owners = match self.matching_rule(&path) {
            Some(rule) if rule.is_negation() => {
                trace!("'{}' cleared by negation on line {}", path, rule.line());
                Vec::new()
            }
            Some(rule) => {
                trace!("'{}' owned via line {}", path, rule.line());
                rule.owners().to_vec()
            }
            None => Vec::new(),
        };

        self.memo.borrow_mut().insert(path, owners.clone());
        owners
    }

    /// Number of distinct paths resolved so far.
    pub fn memoized_paths(&self) -> usize {
        self.memo.borrow().len()
    }
}

/// Converts a path to the repository-relative, forward-slash form rules match against.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let mut trimmed = path.as_str();
    while let Some(rest) = trimmed.strip_prefix("./") {
        trimmed = rest;
    }
    trimmed.trim_start_matches('/').to_string()
}
