//! Pattern compilation for CODEOWNERS rules.
//!
//! Patterns follow the gitignore-style rules used by GitHub CODEOWNERS files:
//!
//! - `*` matches any sequence of non-slash characters
//! - `**` matches any sequence including slashes (any path)
//! - `/` at the start anchors to the repository root
//! - `/` at the end matches only directories (and so every file below them)
//! - Patterns without a slash match at any depth

use crate::error::PatternError;
use globset::{GlobBuilder, GlobMatcher};

/// A compiled CODEOWNERS pattern that can match repository paths.
#[derive(Debug, Clone)]
pub struct PathPattern {
    /// The pattern string as written (negation marker already removed).
    original: String,
    /// The compiled glob matcher.
    matcher: GlobMatcher,
    /// Whether this pattern is anchored to the root.
    anchored: bool,
    /// Whether this pattern matches only directories.
    directory_only: bool,
}

impl PathPattern {
    /// Compiles a CODEOWNERS pattern into a whole-path matcher.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] carrying the literal pattern when the glob
    /// cannot be compiled, e.g. an unclosed character class like `[invalid`.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let (glob_pattern, anchored, directory_only) = normalize_pattern(pattern);

        // literal_separator keeps `*` and `?` from crossing `/`
        let glob = GlobBuilder::new(&glob_pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| PatternError {
                pattern: pattern.to_string(),
                source,
            })?;

        Ok(Self {
            original: pattern.to_string(),
            matcher: glob.compile_matcher(),
            anchored,
            directory_only,
        })
    }

    /// Returns the original pattern string.
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// Returns true if this pattern is anchored to the repository root.
    pub fn is_anchored(&self) -> bool {
        self.anchored
    }

    /// Returns true if this pattern matches only directories.
    pub fn is_directory_only(&self) -> bool {
        self.directory_only
    }

    /// Checks if this pattern matches the given path.
    ///
    /// The path should be relative to the repository root and use forward slashes.
    pub fn matches(&self, path: &str) -> bool {
        let path = path.strip_prefix('/').unwrap_or(path);
        self.matcher.is_match(path)
    }
}

/// Normalizes a CODEOWNERS pattern to a glob pattern.
///
/// Returns (glob_pattern, is_anchored, is_directory_only).
fn normalize_pattern(pattern: &str) -> (String, bool, bool) {
    let (pattern, directory_only) = match pattern.strip_suffix('/') {
        Some(stripped) => (stripped, true),
        None => (pattern, false),
    };

    let (mut glob, anchored) = match pattern.strip_prefix('/') {
        // Anchored patterns are already relative to root
        Some(stripped) => (stripped.to_string(), true),
        // A slash-free pattern matches anywhere in the tree
        None if !pattern.contains('/') => (format!("**/{}", pattern), false),
        // An inner slash makes the pattern relative to root
        None => (pattern.to_string(), false),
    };

    if glob.is_empty() || glob == "**/" {
        glob = "**".to_string();
    } else if directory_only {
        // /docs/ should become docs/** to match docs/anything
        glob.push_str("/**");
    }

    (glob, anchored, directory_only)
}
