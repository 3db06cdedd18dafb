//! Repository-scoped cache for bulk query results.
//!
//! One [`CacheEntry`] is kept per repository identity. An entry is either
//! wholly usable or wholly ignored: [`CacheEntry::is_valid`] decides, on every
//! read, from the identity and the entry's age. Cache failures never fail a
//! query; they are logged and the query runs uncached.

mod store;

pub use store::{CacheStore, FileCacheStore};

use crate::query::OwnershipResult;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// How long an entry stays usable unless configured otherwise.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Identity shared by every directory that is not inside a repository.
pub const FALLBACK_IDENTITY: &str = "no-repository";

/// Derives the cache identity of a repository from its root directory.
///
/// The identity is the SHA-256 of the canonical root path. When there is no
/// root, or it cannot be canonicalized, [`FALLBACK_IDENTITY`] is returned and
/// all such directories share one cache bucket.
pub fn repository_identity(repo_root: Option<&Path>) -> String {
    match repo_root.and_then(|root| root.canonicalize().ok()) {
        Some(canonical) => sha256_hex(canonical.to_string_lossy().as_bytes()),
        None => FALLBACK_IDENTITY.to_string(),
    }
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Builds the cache key for a query.
pub fn query_key(path: &str, recursive: bool) -> String {
    format!("{}:{}", path, recursive)
}

/// Seconds since the Unix epoch.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Cached query results for one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The identity of the repository the results belong to.
    pub repository_identity: String,
    /// Digest of the CODEOWNERS text the results were resolved with.
    #[serde(default)]
    pub rules_digest: String,
    /// When the entry was last written, in Unix seconds.
    pub created_at: u64,
    /// Query results by [`query_key`].
    pub entries: BTreeMap<String, OwnershipResult>,
}

impl CacheEntry {
    /// Creates an empty entry.
    pub fn new(
        repository_identity: impl Into<String>,
        rules_digest: impl Into<String>,
        created_at: u64,
    ) -> Self {
        Self {
            repository_identity: repository_identity.into(),
            rules_digest: rules_digest.into(),
            created_at,
            entries: BTreeMap::new(),
        }
    }

    /// Returns true if the entry belongs to `identity`, was resolved with the
    /// rules hashed as `rules_digest`, and is at most `ttl` old at `now`.
    pub fn is_valid(&self, identity: &str, rules_digest: &str, now: u64, ttl: Duration) -> bool {
        self.repository_identity == identity
            && self.rules_digest == rules_digest
            && now.saturating_sub(self.created_at) <= ttl.as_secs()
    }
}

/// Query-result cache for the current repository.
pub struct ResultCache {
    store: Box<dyn CacheStore>,
    identity: String,
    rules_digest: String,
    ttl: Duration,
}

impl ResultCache {
    /// Creates a cache over `store` for the repository with `identity`.
    pub fn new(store: impl CacheStore + 'static, identity: impl Into<String>) -> Self {
        Self {
            store: Box::new(store),
            identity: identity.into(),
            rules_digest: String::new(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Sets how long entries stay usable.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Ties entries to a rule set; entries written under another digest are ignored.
    pub fn with_rules_digest(mut self, rules_digest: impl Into<String>) -> Self {
        self.rules_digest = rules_digest.into();
        self
    }

    /// The repository identity this cache reads and writes.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// The configured time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached result for `key`, if the repository's entry is valid.
    pub fn get(&self, key: &str) -> Option<OwnershipResult> {
        self.load_valid(unix_now())?.entries.get(key).cloned()
    }

    /// Stores `result` under `key` and rewrites the whole entry with a fresh timestamp.
    pub fn put(&self, key: &str, result: &OwnershipResult) {
        let now = unix_now();
        let mut entry = self
            .load_valid(now)
            .unwrap_or_else(|| {
                CacheEntry::new(self.identity.clone(), self.rules_digest.clone(), now)
            });
        entry.created_at = now;
        entry.entries.insert(key.to_string(), result.clone());

        match self.store.store(&entry) {
            Ok(()) => debug!("Cached '{}' ({} entries)", key, entry.entries.len()),
            Err(e) => warn!("Failed to write result cache: {}", e),
        }
    }

    /// Deletes the repository's entry. Returns false if the delete failed.
    pub fn clear(&self) -> bool {
        match self.store.delete(&self.identity) {
            Ok(()) => {
                debug!("Cleared result cache for {}", self.identity);
                true
            }
            Err(e) => {
                warn!("Failed to clear result cache: {}", e);
                false
            }
        }
    }

    fn load_valid(&self, now: u64) -> Option<CacheEntry> {
        match self.store.load(&self.identity) {
            Ok(Some(entry)) if entry.is_valid(&self.identity, &self.rules_digest, now, self.ttl) => {
                Some(entry)
            }
            Ok(Some(_)) => {
                debug!("Result cache entry is stale or foreign, ignoring it");
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read result cache: {}", e);
                None
            }
        }
    }
}

impl std::fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("store", &"<dyn CacheStore>")
            .field("identity", &self.identity)
            .field("rules_digest", &self.rules_digest)
            .field("ttl", &self.ttl)
            .finish()
    }
}
