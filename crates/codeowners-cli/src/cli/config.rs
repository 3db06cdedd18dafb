//! Configuration handling for the CLI.
//!
//! Turns CLI arguments into the library's building blocks: the repository
//! root, the result cache, and an authenticated GitHub client.

use crate::cli::Args;
use crate::cli::repo::{GITHUB_API_URL, Repository};
use codeowners_query_core::{ConfigError, FileCacheStore, ResultCache};
use jsonwebtoken::EncodingKey;
use octocrab::Octocrab;
use octocrab::models::{AppId, InstallationId};
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors that stop the CLI before it can answer.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// No usable CODEOWNERS file.
    #[error(transparent)]
    Codeowners(#[from] ConfigError),

    /// The cache entry exists but could not be deleted.
    #[error("failed to clear cached results for '{}'", .0.display())]
    CacheClear(std::path::PathBuf),

    /// GitHub authentication error.
    #[error("GitHub authentication error: {0}")]
    GitHubAuth(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// The command succeeded.
    Success = 0,
    /// Startup failed (wrong configuration or internal error).
    StartupFailure = 1,
    /// Terminated by signal (SIGINT/SIGTERM).
    Terminated = 2,
    /// Validation found issues.
    ValidationFailed = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

/// Validated and processed configuration for running a command.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// The repository being queried.
    pub repository: Repository,
    /// Maximum age of cached results.
    pub cache_ttl: Duration,
    /// Whether the cache is consulted at all.
    pub use_cache: bool,
    /// GitHub API base URL for team checks.
    pub github_base_url: String,
    /// Whether to output JSON.
    pub json_output: bool,
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments.
    pub fn from_args(args: &Args) -> Result<Self, CliError> {
        if args.cache_ttl_secs == 0 && args.uses_cache() {
            return Err(CliError::Invalid(
                "cache TTL must be positive (use --no-cache to disable caching)".to_string(),
            ));
        }

        let repository = Repository::discover(&args.repository_path)?;
        let github_base_url = args
            .github_base_url
            .clone()
            .or_else(|| repository.github_api_base())
            .unwrap_or_else(|| GITHUB_API_URL.to_string());

        Ok(Self {
            repository,
            cache_ttl: Duration::from_secs(args.cache_ttl_secs),
            use_cache: args.uses_cache(),
            github_base_url,
            json_output: args.json,
        })
    }

    /// Builds the result cache for this repository, if caching is enabled.
    pub fn result_cache(&self) -> Option<ResultCache> {
        self.use_cache.then(|| {
            ResultCache::new(FileCacheStore::in_temp_dir(), self.repository.identity())
                .with_ttl(self.cache_ttl)
        })
    }

    /// Builds a cache handle regardless of `--no-cache`, for clearing.
    pub fn cache_handle(&self) -> ResultCache {
        ResultCache::new(FileCacheStore::in_temp_dir(), self.repository.identity())
    }

    /// Deletes this repository's cached results, whether or not caching is enabled.
    pub fn clear_cache(&self) -> Result<(), CliError> {
        clear_cache(&self.cache_handle(), self.repository.root())
    }

    /// Determines the exit code from validation results.
    pub fn exit_code_for_issues(&self, issue_count: usize) -> ExitCode {
        if issue_count > 0 {
            ExitCode::ValidationFailed
        } else {
            ExitCode::Success
        }
    }
}

/// Deletes the entry behind `cache`. A missing entry counts as cleared.
pub fn clear_cache(cache: &ResultCache, root: &Path) -> Result<(), CliError> {
    if cache.clear() {
        Ok(())
    } else {
        Err(CliError::CacheClear(root.to_path_buf()))
    }
}

/// Creates an authenticated Octocrab client from CLI arguments.
///
/// Returns `Ok(None)` when no credentials are configured.
pub fn create_octocrab(args: &Args, base_url: &str) -> Result<Option<Octocrab>, CliError> {
    if !args.has_github_auth() {
        return Ok(None);
    }

    let custom_base = (base_url != GITHUB_API_URL).then_some(base_url);

    if let (Some(app_id), Some(installation_id), Some(private_key)) = (
        args.github_app_id,
        args.github_app_installation_id,
        args.github_app_private_key.as_ref(),
    ) {
        let private_key = SecretString::from(private_key.clone());
        let key = EncodingKey::from_rsa_pem(private_key.expose_secret().as_bytes())
            .map_err(|e| CliError::GitHubAuth(format!("invalid private key: {}", e)))?;

        let mut app_builder = Octocrab::builder().app(AppId(app_id), key);
        if let Some(url) = custom_base {
            app_builder = app_builder
                .base_uri(url)
                .map_err(|e| CliError::GitHubAuth(format!("invalid base URL: {}", e)))?;
        }
        let app_client = app_builder
            .build()
            .map_err(|e| CliError::GitHubAuth(format!("failed to create app client: {}", e)))?;

        let client = app_client
            .installation(InstallationId(installation_id))
            .map_err(|e| {
                CliError::GitHubAuth(format!("failed to get installation client: {}", e))
            })?;

        return Ok(Some(client));
    }

    let Some(token) = args.github_access_token.as_ref() else {
        return Ok(None);
    };
    let token = SecretString::from(token.clone());

    let mut builder = Octocrab::builder();
    if let Some(url) = custom_base {
        builder = builder
            .base_uri(url)
            .map_err(|e| CliError::GitHubAuth(format!("invalid base URL: {}", e)))?;
    }
    let client = builder
        .personal_token(token.expose_secret().to_string())
        .build()
        .map_err(|e| CliError::GitHubAuth(format!("failed to build client: {}", e)))?;

    Ok(Some(client))
}
