//! Error types for ownership resolution.
//!
//! Only [`ConfigError`] is fatal. Every other error is reported as a warning
//! by the component that hits it, and the operation degrades gracefully.

use std::path::PathBuf;
use thiserror::Error;

/// The ownership rules could not be loaded at all.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// None of the candidate CODEOWNERS locations exist.
    #[error("no CODEOWNERS file found. Searched in: {}", display_paths(.searched))]
    NoRulesFound {
        /// Every location that was checked, in priority order.
        searched: Vec<PathBuf>,
    },

    /// A CODEOWNERS file exists but could not be read.
    #[error("failed to read CODEOWNERS file '{}': {source}", .path.display())]
    Read {
        /// The file that failed to read.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A single pattern could not be compiled into a matcher.
#[derive(Debug, Clone, Error)]
#[error("invalid pattern '{pattern}': {source}")]
pub struct PatternError {
    /// The literal pattern text as written in the file.
    pub pattern: String,
    /// The glob compilation error.
    pub source: globset::Error,
}

/// A bulk query could not be answered.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The query target does not exist on disk.
    #[error("path '{}' does not exist", .0.display())]
    PathNotFound(PathBuf),

    /// The query target lies outside the repository root.
    #[error("path '{}' is outside the repository", .0.display())]
    OutsideRepository(PathBuf),
}

/// Reading or writing the on-disk result cache failed.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem error while creating, reading, writing or deleting.
    #[error("cache IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored entry could not be (de)serialized.
    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The team-existence checker could not give an answer.
#[derive(Debug, Error)]
pub enum TeamCheckError {
    /// An API error occurred.
    #[error("GitHub API error: {0}")]
    ApiError(String),

    /// A network error occurred.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Insufficient authorization to look the team up.
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// No checker is configured (for example, no access token).
    #[error("team checks unavailable: {0}")]
    Unavailable(String),
}
