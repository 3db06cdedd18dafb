//! Bulk ownership queries over the repository tree.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use codeowners_query_core::{BulkQueryEngine, OwnershipResolver, RuleStore};
//!
//! let repo = Path::new("/path/to/repo");
//! let resolver = OwnershipResolver::new(RuleStore::build(repo)?);
//! let engine = BulkQueryEngine::new(&resolver, repo);
//!
//! for (path, owners) in engine.query_files("src", true)? {
//!     println!("{path}: {}", owners.join(" "));
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod file_walker;

pub use file_walker::{FileWalkerConfig, list_files};

use crate::cache::{ResultCache, query_key};
use crate::error::QueryError;
use crate::resolve::OwnershipResolver;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Owners per repository-relative file path, sorted by path.
pub type OwnershipResult = BTreeMap<String, Vec<String>>;

/// Enumerates files and resolves the owners of each.
pub struct BulkQueryEngine<'a> {
    resolver: &'a OwnershipResolver,
    repo_root: PathBuf,
    walker: FileWalkerConfig,
    cache: Option<ResultCache>,
}

impl<'a> BulkQueryEngine<'a> {
    /// Creates an engine for the repository at `repo_root`, without caching.
    pub fn new(resolver: &'a OwnershipResolver, repo_root: impl Into<PathBuf>) -> Self {
        let repo_root = repo_root.into();
        let repo_root = repo_root.canonicalize().unwrap_or(repo_root);
        Self {
            resolver,
            repo_root,
            walker: FileWalkerConfig::for_ownership_query(),
            cache: None,
        }
    }

    /// Stores and reuses query results through `cache`.
    ///
    /// The cache is keyed to the resolver's rules, so results computed
    /// from a different CODEOWNERS text are never returned.
    pub fn with_cache(mut self, cache: ResultCache) -> Self {
        self.cache = Some(cache.with_rules_digest(self.resolver.store().digest()));
        self
    }

    /// Overrides how files are enumerated. The depth limit is set per query.
    pub fn with_walker_config(mut self, config: FileWalkerConfig) -> Self {
        self.walker = config;
        self
    }

    /// The resolver used for every file.
    pub fn resolver(&self) -> &'a OwnershipResolver {
        self.resolver
    }

    /// The canonical repository root.
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// The result cache, when caching is enabled.
    pub fn cache(&self) -> Option<&ResultCache> {
        self.cache.as_ref()
    }

    /// Resolves owners for `path`: one file, a directory's immediate files,
    /// or (with `recursive`) every file below a directory.
    ///
    /// Relative paths are taken from the repository root.
    ///
    /// # Errors
    ///
    /// [`QueryError::PathNotFound`] if `path` does not exist, and
    /// [`QueryError::OutsideRepository`] if it resolves outside the root.
    pub fn query_files(
        &self,
        path: impl AsRef<Path>,
        recursive: bool,
    ) -> Result<OwnershipResult, QueryError> {
        let path = path.as_ref();
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.repo_root.join(path)
        };

        let target = joined
            .canonicalize()
            .map_err(|_| QueryError::PathNotFound(path.to_path_buf()))?;
        let relative = self.relative_path(&target)?;

        let key = query_key(&relative, recursive);
        if let Some(hit) = self.cache.as_ref().and_then(|cache| cache.get(&key)) {
            debug!("Cache hit for '{}' ({} files)", key, hit.len());
            return Ok(hit);
        }

        let result = if target.is_file() {
            let mut result = OwnershipResult::new();
            result.insert(relative.clone(), self.resolver.resolve(&relative));
            result
        } else {
            let depth = if recursive { None } else { Some(1) };
            let config = self.walker.clone().with_max_depth(depth);
            list_files(&target, &config)
                .into_iter()
                .map(|file| {
                    let file = join_relative(&relative, &file);
                    let owners = self.resolver.resolve(&file);
                    (file, owners)
                })
                .collect()
        };

        debug!("Resolved {} files for '{}'", result.len(), key);
        if let Some(cache) = &self.cache {
            cache.put(&key, &result);
        }
        Ok(result)
    }

    /// Like [`query_files`](Self::query_files), but logs failures and
    /// returns an empty result instead.
    pub fn query_files_or_empty(&self, path: impl AsRef<Path>, recursive: bool) -> OwnershipResult {
        match self.query_files(path, recursive) {
            Ok(result) => result,
            Err(e) => {
                warn!("{}", e);
                OwnershipResult::new()
            }
        }
    }

    /// Every file in the repository whose owners include `owner`.
    pub fn files_owned_by(&self, owner: &str) -> OwnershipResult {
        self.query_files_or_empty(".", true)
            .into_iter()
            .filter(|(_, owners)| owners.iter().any(|o| o == owner))
            .collect()
    }

    /// Every file in the repository without owners.
    pub fn unowned_files(&self) -> OwnershipResult {
        self.query_files_or_empty(".", true)
            .into_iter()
            .filter(|(_, owners)| owners.is_empty())
            .collect()
    }

    fn relative_path(&self, target: &Path) -> Result<String, QueryError> {
        let relative = target
            .strip_prefix(&self.repo_root)
            .map_err(|_| QueryError::OutsideRepository(target.to_path_buf()))?;
        let relative = relative.to_string_lossy().replace('\\', "/");
        Ok(if relative.is_empty() {
            ".".to_string()
        } else {
            relative
        })
    }
}

fn join_relative(dir: &str, file: &str) -> String {
    if dir == "." {
        file.to_string()
    } else {
        format!("{}/{}", dir, file)
    }
}
