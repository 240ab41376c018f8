//! Enumeration of the files both trees are compared over
//!
//! A path is excluded when any of its components is in [`IGNORED_NAMES`], or
//! when the local project's git ignore rules match it. Excluded directories
//! are pruned, not descended into. Git is only consulted for paths that got
//! past the static list.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use git2::{Index, Repository};
use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::{Result, fs as fs_error};

/// Names that are never compared, at any depth.
///
/// These are either project specific (sources, docs, changelog) or owned by
/// a dedicated reconciler (`package.json`, Yarn files).
pub const IGNORED_NAMES: &[&str] = &[
    ".git",
    ".yarn",
    ".yarnrc.yml",
    "src",
    "CHANGELOG.md",
    "LICENSE",
    "README.md",
    "package.json",
    "yarn.lock",
];

/// Ignore rules of the local project's repository
pub struct IgnoreFilter {
    repo: Option<Repository>,
    index: Option<Index>,
    /// Location of the project root inside the repository's working directory
    prefix: PathBuf,
}

impl IgnoreFilter {
    /// Load the ignore rules of the repository containing `local_root`.
    ///
    /// Outside a repository only the static names apply.
    pub fn for_project(local_root: &Path) -> Self {
        let Ok(repo) = Repository::discover(local_root) else {
            debug!(root = %local_root.display(), "no repository, only static ignores apply");
            return Self::static_only();
        };

        let prefix = repo
            .workdir()
            .and_then(|workdir| {
                let workdir = dunce::canonicalize(workdir).ok()?;
                let root = dunce::canonicalize(local_root).ok()?;
                root.strip_prefix(&workdir).ok().map(Path::to_path_buf)
            })
            .unwrap_or_default();
        let index = repo.index().ok();

        Self {
            repo: Some(repo),
            index,
            prefix,
        }
    }

    pub fn static_only() -> Self {
        Self {
            repo: None,
            index: None,
            prefix: PathBuf::new(),
        }
    }

    pub fn is_statically_ignored(name: &OsStr) -> bool {
        IGNORED_NAMES.iter().any(|ignored| OsStr::new(ignored) == name)
    }

    /// Whether the repository's ignore rules match `relative`.
    ///
    /// Files already in the index are never ignored, like `git status`.
    pub fn is_vcs_ignored(&self, relative: &Path) -> bool {
        let Some(repo) = &self.repo else {
            return false;
        };
        let in_repo = self.prefix.join(relative);

        if self
            .index
            .as_ref()
            .is_some_and(|index| index.get_path(&in_repo, 0).is_some())
        {
            return false;
        }

        match repo.is_path_ignored(&in_repo) {
            Ok(ignored) => ignored,
            Err(e) => {
                debug!(path = %in_repo.display(), error = %e, "ignore lookup failed");
                false
            }
        }
    }

    /// Whether `relative` (relative to a tree root) is left out of comparison
    pub fn is_excluded(&self, relative: &Path) -> bool {
        relative
            .components()
            .any(|component| Self::is_statically_ignored(component.as_os_str()))
            || self.is_vcs_ignored(relative)
    }
}

/// Files under `root` that survive `filter`, as paths relative to `root`.
///
/// Anything that is not a directory counts as a file. Entries are sorted by
/// name within each directory.
pub fn project_files<'a>(
    root: &'a Path,
    filter: &'a IgnoreFilter,
) -> impl Iterator<Item = Result<PathBuf>> + 'a {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| {
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let excluded = filter.is_excluded(relative);
            if excluded {
                trace!(path = %relative.display(), "excluded");
            }
            !excluded
        })
        .filter_map(move |entry| match entry {
            Ok(entry) if entry.file_type().is_dir() => None,
            Ok(entry) => Some(Ok(entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_path_buf())),
            Err(e) => Some(Err(fs_error::io_error(format!(
                "Failed to walk {}: {e}",
                root.display()
            )))),
        })
}
