//! Command-line interface for the CODEOWNERS query tool.
//!
//! Arguments are parsed with Clap; every global option can also be set
//! through an environment variable.

pub mod config;
pub mod github;
pub mod output;
pub mod repo;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CODEOWNERS query tool - answers "who owns this file?".
///
/// Reads the repository's CODEOWNERS file and resolves the owners of
/// individual paths, whole directory trees, or a single owner's files.
#[derive(Parser, Debug)]
#[command(name = "codeowners-query")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path inside the repository to query.
    #[arg(long, env = "REPOSITORY_PATH", default_value = ".", global = true)]
    pub repository_path: PathBuf,

    /// GitHub personal access token used to check that teams exist.
    #[arg(long, env = "GITHUB_ACCESS_TOKEN", global = true, hide_env_values = true)]
    pub github_access_token: Option<String>,

    /// GitHub API base URL (derived from the `origin` remote when omitted).
    #[arg(long, env = "GITHUB_BASE_URL", global = true)]
    pub github_base_url: Option<String>,

    /// GitHub App ID for authentication (alternative to access token).
    #[arg(long, env = "GITHUB_APP_ID", global = true)]
    pub github_app_id: Option<u64>,

    /// GitHub App Installation ID (required when using App authentication).
    #[arg(long, env = "GITHUB_APP_INSTALLATION_ID", global = true)]
    pub github_app_installation_id: Option<u64>,

    /// GitHub App private key in PEM format (required when using App authentication).
    #[arg(long, env = "GITHUB_APP_PRIVATE_KEY", global = true, hide_env_values = true)]
    pub github_app_private_key: Option<String>,

    /// Maximum age of cached query results, in seconds.
    #[arg(long, env = "CODEOWNERS_CACHE_TTL", default_value_t = 3600, global = true)]
    pub cache_ttl_secs: u64,

    /// Neither read nor write the query-result cache.
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Output results as JSON instead of human-readable format.
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Increase verbosity level (-v for info, -vv for debug, -vvv for trace).
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// What to ask about the repository.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the owners of each path.
    Owners {
        /// Files to look up (need not exist).
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Print the owners of every file in a directory.
    Files {
        /// File or directory to query.
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Descend into subdirectories.
        #[arg(long, short = 'r')]
        recursive: bool,
    },
    /// List every file owned by OWNER.
    OwnedBy {
        /// Owner to look for, e.g. `@org/team`.
        owner: String,
    },
    /// List every file without owners.
    Unowned,
    /// Check the CODEOWNERS file for problems.
    Validate,
    /// Delete cached query results for this repository.
    CacheClear,
}

impl Args {
    /// Returns true if GitHub authentication is configured.
    pub fn has_github_auth(&self) -> bool {
        self.github_access_token.is_some() || self.has_github_app_auth()
    }

    /// Returns true if GitHub App authentication is configured.
    pub fn has_github_app_auth(&self) -> bool {
        self.github_app_id.is_some()
            && self.github_app_installation_id.is_some()
            && self.github_app_private_key.is_some()
    }

    /// Returns true if the command reads or writes cached results.
    pub fn uses_cache(&self) -> bool {
        !self.no_cache
            && matches!(
                self.command,
                Command::Files { .. } | Command::OwnedBy { .. } | Command::Unowned | Command::Validate
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owners_paths() {
        let args = Args::parse_from(["codeowners-query", "owners", "src/main.go", "docs/a.md"]);
        assert_eq!(
            args.command,
            Command::Owners {
                paths: vec!["src/main.go".to_string(), "docs/a.md".to_string()]
            }
        );
    }

    #[test]
    fn test_owners_requires_path() {
        assert!(Args::try_parse_from(["codeowners-query", "owners"]).is_err());
    }

    #[test]
    fn test_files_defaults() {
        let args = Args::parse_from(["codeowners-query", "files"]);
        assert_eq!(
            args.command,
            Command::Files {
                path: PathBuf::from("."),
                recursive: false
            }
        );

        let args = Args::parse_from(["codeowners-query", "files", "src", "-r"]);
        assert_eq!(
            args.command,
            Command::Files {
                path: PathBuf::from("src"),
                recursive: true
            }
        );
    }

    #[test]
    fn test_kebab_case_subcommands() {
        let args = Args::parse_from(["codeowners-query", "owned-by", "@org/docs"]);
        assert_eq!(
            args.command,
            Command::OwnedBy {
                owner: "@org/docs".to_string()
            }
        );

        let args = Args::parse_from(["codeowners-query", "cache-clear"]);
        assert_eq!(args.command, Command::CacheClear);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::parse_from(["codeowners-query", "unowned", "-j", "-vv", "--no-cache"]);
        assert!(args.json);
        assert_eq!(args.verbose, 2);
        assert!(args.no_cache);
        assert!(!args.uses_cache());
    }

    #[test]
    fn test_default_cache_ttl() {
        let args = Args::parse_from(["codeowners-query", "validate"]);
        assert_eq!(args.cache_ttl_secs, 3600);

        let args = Args::parse_from(["codeowners-query", "validate", "--cache-ttl-secs", "60"]);
        assert_eq!(args.cache_ttl_secs, 60);
    }

    #[test]
    fn test_uses_cache_by_command() {
        let args = Args::parse_from(["codeowners-query", "files"]);
        assert!(args.uses_cache());

        let args = Args::parse_from(["codeowners-query", "owners", "a.rs"]);
        assert!(!args.uses_cache());
    }

    #[test]
    fn test_github_auth_detection() {
        let args = Args::parse_from(["codeowners-query", "validate"]);
        assert!(!args.has_github_auth());

        let args = Args::parse_from([
            "codeowners-query",
            "validate",
            "--github-access-token",
            "ghp_test",
        ]);
        assert!(args.has_github_auth());
        assert!(!args.has_github_app_auth());

        let args = Args::parse_from([
            "codeowners-query",
            "validate",
            "--github-app-id",
            "1",
            "--github-app-installation-id",
            "2",
        ]);
        assert!(!args.has_github_auth());
    }
}
