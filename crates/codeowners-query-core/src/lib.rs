//! CODEOWNERS Query Core
//!
//! A library for answering "who owns this file?" from a GitHub CODEOWNERS file.
//!
//! # Features
//!
//! - **Pattern compiler**: gitignore-style CODEOWNERS patterns to whole-path matchers
//! - **Rule store**: ordered rules; a bad pattern skips one rule, not the file
//! - **Resolver**: last-match-wins precedence, with `!pattern` negation clearing ownership
//! - **Bulk queries**: owners for every file below a path, with a repository-scoped cache
//! - **Validation**: duplicate patterns, unknown teams, unowned files
//!
//! # Quick Start
//!
//! ```rust
//! use codeowners_query_core::{OwnershipResolver, RuleStore};
//!
//! let input = r#"
//! # CODEOWNERS file
//! *.go @org/backend
//! src/*.go @org/frontend
//! docs/** @org/docs
//! !docs/internal/**
//! "#;
//!
//! let resolver = OwnershipResolver::new(RuleStore::parse("CODEOWNERS", input));
//!
//! assert_eq!(resolver.resolve("src/main.go"), vec!["@org/frontend"]);
//! assert_eq!(resolver.resolve("other/x.go"), vec!["@org/backend"]);
//! assert!(resolver.resolve("docs/internal/secret.md").is_empty());
//! ```
//!
//! # Modules
//!
//! - [`matching`]: Pattern compilation
//! - [`parse`]: Line parser for CODEOWNERS text
//! - [`rules`]: The rule store and CODEOWNERS discovery
//! - [`resolve`]: Ownership resolution
//! - [`query`]: Bulk queries over the file tree
//! - [`cache`]: The query-result cache
//! - [`validate`]: Consistency checks

pub mod cache;
pub mod error;
pub mod matching;
pub mod parse;
pub mod query;
pub mod resolve;
pub mod rules;
pub mod validate;

// Re-export commonly used types at the crate root
pub use cache::{CacheEntry, CacheStore, FileCacheStore, ResultCache, repository_identity};
pub use error::{CacheError, ConfigError, PatternError, QueryError, TeamCheckError};
pub use matching::PathPattern;
pub use query::{BulkQueryEngine, OwnershipResult};
pub use resolve::OwnershipResolver;
pub use rules::{Rule, RuleStore, find_codeowners_files};
pub use validate::{Severity, TeamChecker, ValidationIssue, Validator};
