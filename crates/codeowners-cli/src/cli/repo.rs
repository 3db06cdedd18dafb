//! Repository discovery through the `git` command line.

use codeowners_query_core::repository_identity;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::cli::config::CliError;

/// Public GitHub API endpoint.
pub const GITHUB_API_URL: &str = "https://api.github.com/";

/// The repository a command runs against.
#[derive(Debug, Clone)]
pub struct Repository {
    root: PathBuf,
    in_git: bool,
    remote: Option<String>,
}

impl Repository {
    /// Finds the repository containing `start`.
    ///
    /// Uses the git toplevel when `start` is inside a work tree; otherwise
    /// `start` itself is treated as the root.
    pub fn discover(start: &Path) -> Result<Self, CliError> {
        let start = start.canonicalize().map_err(|e| {
            CliError::Invalid(format!(
                "repository path '{}' is invalid: {}",
                start.display(),
                e
            ))
        })?;

        match git(&start, &["rev-parse", "--show-toplevel"]) {
            Some(toplevel) => {
                let root = PathBuf::from(toplevel);
                let root = root.canonicalize().unwrap_or(root);
                let remote = git(&root, &["remote", "get-url", "origin"]);
                debug!("Git toplevel: {}, origin: {:?}", root.display(), remote);
                Ok(Self {
                    root,
                    in_git: true,
                    remote,
                })
            }
            None => {
                debug!("'{}' is not inside a git work tree", start.display());
                Ok(Self {
                    root: start,
                    in_git: false,
                    remote: None,
                })
            }
        }
    }

    /// Returns the repository root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns true if the root came from git.
    pub fn is_git(&self) -> bool {
        self.in_git
    }

    /// Returns the URL of the `origin` remote, if any.
    pub fn remote(&self) -> Option<&str> {
        self.remote.as_deref()
    }

    /// Cache identity of this repository.
    pub fn identity(&self) -> String {
        repository_identity(self.in_git.then_some(self.root.as_path()))
    }

    /// GitHub API base URL for the `origin` remote.
    pub fn github_api_base(&self) -> Option<String> {
        self.remote.as_deref().and_then(github_api_base)
    }
}

/// Runs `git -C dir <args>` and returns trimmed stdout on success.
fn git(dir: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .map_err(|e| debug!("git {}: {}", args.join(" "), e))
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!stdout.is_empty()).then_some(stdout)
}

/// Maps a git remote URL to the API endpoint of the GitHub instance hosting it.
///
/// `github.com` maps to the public API; any other host is treated as
/// GitHub Enterprise (`https://<host>/api/v3/`).
pub fn github_api_base(remote: &str) -> Option<String> {
    let host = remote_host(remote)?;
    if host.eq_ignore_ascii_case("github.com") {
        Some(GITHUB_API_URL.to_string())
    } else {
        Some(format!("https://{}/api/v3/", host))
    }
}

fn remote_host(remote: &str) -> Option<&str> {
    let remote = remote.trim();
    let authority = match remote.split_once("://") {
        Some((_, rest)) => rest.split('/').next()?,
        // scp-like syntax: [user@]host:path
        None => remote.split_once(':')?.0,
    };
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    let host = host.split(':').next()?;
    (!host.is_empty()).then_some(host)
}

/// Converts a path typed by the user into a repository-relative path.
///
/// Paths that exist are resolved against `cwd`; anything else is taken as
/// already relative to the repository root.
pub fn repo_relative(root: &Path, cwd: &Path, path: &str) -> String {
    let candidate = cwd.join(path);
    if let Ok(canonical) = candidate.canonicalize()
        && let Ok(relative) = canonical.strip_prefix(root)
    {
        let relative = relative.to_string_lossy().replace('\\', "/");
        if !relative.is_empty() {
            return relative;
        }
    }
    path.to_string()
}

/// Picks the directory or file a bulk query should walk.
///
/// A relative path that exists under `cwd` inside the repository is taken
/// from `cwd`; otherwise it is taken from the repository root. Absolute
/// paths are used as given.
pub fn resolve_query_path(root: &Path, cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let from_cwd = cwd.join(path);
    if let Ok(canonical) = from_cwd.canonicalize()
        && canonical.starts_with(root)
    {
        return from_cwd;
    }
    root.join(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_api_base_github_com() {
        for remote in [
            "git@github.com:org/repo.git",
            "https://github.com/org/repo.git",
            "ssh://git@github.com/org/repo",
            "https://token@github.com/org/repo",
        ] {
            assert_eq!(github_api_base(remote).as_deref(), Some(GITHUB_API_URL), "{remote}");
        }
    }

    #[test]
    fn test_api_base_enterprise() {
        assert_eq!(
            github_api_base("git@ghe.example.com:org/repo.git").as_deref(),
            Some("https://ghe.example.com/api/v3/")
        );
        assert_eq!(
            github_api_base("https://ghe.example.com:8443/org/repo").as_deref(),
            Some("https://ghe.example.com/api/v3/")
        );
    }

    #[test]
    fn test_api_base_unparseable() {
        assert_eq!(github_api_base("/srv/git/repo.git"), None);
        assert_eq!(github_api_base(""), None);
    }

    #[test]
    fn test_repo_relative_existing_path() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src/nested")).unwrap();
        fs::write(dir.path().join("src/nested/lib.rs"), "").unwrap();
        let root = dir.path().canonicalize().unwrap();

        let cwd = root.join("src");
        assert_eq!(repo_relative(&root, &cwd, "nested/lib.rs"), "src/nested/lib.rs");
    }

    #[test]
    fn test_repo_relative_missing_path_is_kept() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        assert_eq!(repo_relative(&root, &root, "src/main.go"), "src/main.go");
    }

    #[test]
    fn test_discover_without_git_uses_start() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::discover(dir.path()).unwrap();
        // Only meaningful when the temp dir is not itself inside a work tree.
        if !repo.is_git() {
            assert_eq!(repo.root(), dir.path().canonicalize().unwrap());
            assert_eq!(repo.identity(), codeowners_query_core::cache::FALLBACK_IDENTITY);
            assert_eq!(repo.remote(), None);
        }
    }

    #[test]
    fn test_discover_missing_path() {
        let dir = TempDir::new().unwrap();
        assert!(Repository::discover(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_query_path_from_outside_repository_uses_root() {
        let repo = TempDir::new().unwrap();
        fs::create_dir_all(repo.path().join("src")).unwrap();
        let elsewhere = TempDir::new().unwrap();
        let root = repo.path().canonicalize().unwrap();

        assert_eq!(
            resolve_query_path(&root, elsewhere.path(), Path::new(".")),
            root.join(".")
        );
        assert_eq!(
            resolve_query_path(&root, elsewhere.path(), Path::new("src")),
            root.join("src")
        );
    }

    #[test]
    fn test_query_path_inside_repository_uses_cwd() {
        let repo = TempDir::new().unwrap();
        fs::create_dir_all(repo.path().join("src/nested")).unwrap();
        let root = repo.path().canonicalize().unwrap();
        let cwd = root.join("src");

        assert_eq!(
            resolve_query_path(&root, &cwd, Path::new("nested")),
            cwd.join("nested")
        );
        assert_eq!(resolve_query_path(&root, &cwd, Path::new(".")), cwd.join("."));
    }

    #[test]
    fn test_query_path_absolute_is_kept() {
        let repo = TempDir::new().unwrap();
        let root = repo.path().canonicalize().unwrap();
        let absolute = root.join("docs");
        assert_eq!(resolve_query_path(&root, Path::new("/"), &absolute), absolute);
    }
}
