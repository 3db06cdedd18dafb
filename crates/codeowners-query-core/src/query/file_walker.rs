//! File enumeration for bulk ownership queries.

use ignore::WalkBuilder;
use log::{debug, trace};
use std::path::Path;

/// Configuration for file walking behavior.
#[derive(Debug, Clone, Default)]
pub struct FileWalkerConfig {
    /// Whether to include hidden files and directories (starting with `.`).
    pub include_hidden: bool,
    /// Whether to respect `.gitignore` rules (only works in git repos).
    pub respect_gitignore: bool,
    /// Maximum depth below the walk root; `None` walks the full subtree.
    pub max_depth: Option<usize>,
}

impl FileWalkerConfig {
    /// Creates a new config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether to include hidden files.
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Sets whether to respect .gitignore rules.
    pub fn with_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Limits the walk to `depth` levels (1 = immediate children only).
    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    /// Configuration for ownership queries: hidden files included, gitignored files skipped.
    pub fn for_ownership_query() -> Self {
        Self {
            include_hidden: true,
            respect_gitignore: true,
            max_depth: None,
        }
    }
}

/// Lists regular files under `root`.
///
/// Returns paths relative to `root` with forward slashes. Directories are
/// never returned and the `.git` directory is never entered.
pub fn list_files(root: &Path, config: &FileWalkerConfig) -> Vec<String> {
    debug!(
        "Listing files in {:?} (hidden={}, gitignore={}, depth={:?})",
        root, config.include_hidden, config.respect_gitignore, config.max_depth
    );

    let walker = WalkBuilder::new(root)
        .hidden(!config.include_hidden)
        .ignore(false)
        .git_ignore(config.respect_gitignore)
        .git_global(config.respect_gitignore)
        .git_exclude(config.respect_gitignore)
        .follow_links(false)
        .max_depth(config.max_depth)
        .filter_entry(|entry| entry.file_name() != ".git")
        .build();

    let mut files = Vec::new();
    for entry in walker.filter_map(|e| e.ok()) {
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        if let Ok(relative) = entry.path().strip_prefix(root)
            && let Some(path_str) = relative.to_str()
        {
            files.push(path_str.replace('\\', "/"));
        }
    }

    debug!("Found {} files", files.len());
    trace!("Files: {:?}", files);
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn setup_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        fs::create_dir_all(dir.path().join("src/nested")).unwrap();
        File::create(dir.path().join("src/main.rs")).unwrap();
        File::create(dir.path().join("src/nested/deep.rs")).unwrap();
        File::create(dir.path().join("visible.txt")).unwrap();

        fs::create_dir_all(dir.path().join(".hidden_dir")).unwrap();
        File::create(dir.path().join(".hidden_dir/config")).unwrap();
        File::create(dir.path().join(".hidden_file")).unwrap();

        fs::create_dir_all(dir.path().join(".git/objects")).unwrap();
        File::create(dir.path().join(".git/HEAD")).unwrap();

        dir
    }

    #[test]
    fn default_excludes_hidden() {
        let dir = setup_test_dir();
        let files = list_files(dir.path(), &FileWalkerConfig::default());

        assert!(files.contains(&"src/main.rs".to_string()));
        assert!(files.contains(&"visible.txt".to_string()));
        assert!(!files.iter().any(|f| f.contains(".hidden")));
    }

    #[test]
    fn include_hidden_files_but_never_git_dir() {
        let dir = setup_test_dir();
        let config = FileWalkerConfig::new().with_hidden(true);
        let files = list_files(dir.path(), &config);

        assert!(files.contains(&".hidden_file".to_string()));
        assert!(files.contains(&".hidden_dir/config".to_string()));
        assert!(!files.iter().any(|f| f.starts_with(".git/")));
    }

    #[test]
    fn directories_are_not_listed() {
        let dir = setup_test_dir();
        let files = list_files(dir.path(), &FileWalkerConfig::default());
        assert!(!files.contains(&"src".to_string()));
        assert!(!files.contains(&"src/nested".to_string()));
    }

    #[test]
    fn max_depth_one_lists_immediate_children() {
        let dir = setup_test_dir();
        let config = FileWalkerConfig::new().with_max_depth(Some(1));
        let files = list_files(&dir.path().join("src"), &config);

        assert_eq!(files, vec!["main.rs".to_string()]);
    }

    #[test]
    fn for_ownership_query_config() {
        let config = FileWalkerConfig::for_ownership_query();
        assert!(config.include_hidden);
        assert!(config.respect_gitignore);
        assert_eq!(config.max_depth, None);
    }

    fn setup_git_repo_with_ignores() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".gitignore"), "target/\n*.log\n").unwrap();
        fs::create_dir_all(dir.path().join("target/debug")).unwrap();
        File::create(dir.path().join("target/debug/app")).unwrap();
        File::create(dir.path().join("build.log")).unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        File::create(dir.path().join("src/lib.rs")).unwrap();
        dir
    }

    #[test]
    fn ownership_query_skips_gitignored_files() {
        let dir = setup_git_repo_with_ignores();
        let mut files = list_files(dir.path(), &FileWalkerConfig::for_ownership_query());
        files.sort();

        assert_eq!(files, vec![".gitignore".to_string(), "src/lib.rs".to_string()]);
    }

    #[test]
    fn gitignore_can_be_disabled() {
        let dir = setup_git_repo_with_ignores();
        let config = FileWalkerConfig::for_ownership_query().with_gitignore(false);
        let files = list_files(dir.path(), &config);

        assert!(files.contains(&"build.log".to_string()));
        assert!(files.contains(&"target/debug/app".to_string()));
    }
}
