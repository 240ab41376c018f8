//! Git operations for the template checkout and the local project
//!
//! This module handles:
//! - Cloning the template, or fast-forwarding an existing checkout
//! - Staging the local project's changes after a write-mode run
//! - Showing a diff between two files (see [`diff`])
//!
//! Authentication is delegated to git's native system (SSH agent and
//! credential helpers); the default template is a public HTTPS repository.

pub mod diff;
pub mod error;

use std::path::Path;

use git2::{
    Cred, CredentialType, FetchOptions, IndexAddOption, RemoteCallbacks, Repository,
    build::{CheckoutBuilder, RepoBuilder},
};
use tracing::debug;

use crate::error::{Result, SyncError, git as git_error};

pub use diff::{DiffViewer, GitDiff};
use error::{clone_reason, pull_reason, stale_checkout};

/// Make sure an up-to-date checkout of `url` exists at `target`.
///
/// An existing checkout is pulled rather than cloned again.
pub fn fetch_template(url: &str, target: &Path) -> Result<()> {
    if target.exists() {
        debug!(path = %target.display(), "pulling existing template checkout");
        pull(target)
    } else {
        debug!(url, path = %target.display(), "cloning template");
        clone(url, target).map(|_| ())
    }
}

/// Normalize SSH URLs from SCP-style (git@host:path) to ssh:// format.
///
/// libgit2 may have issues with SCP-style SSH URLs.
fn normalize_ssh_url(url: &str) -> std::borrow::Cow<'_, str> {
    if !url.starts_with("git@") {
        return std::borrow::Cow::Borrowed(url);
    }

    match url.split_once(':') {
        Some((host, path)) => {
            let path = path.trim_start_matches('/');
            std::borrow::Cow::Owned(format!("ssh://{host}/{path}"))
        }
        None => std::borrow::Cow::Borrowed(url),
    }
}

/// Clone a git repository to a target directory
pub fn clone(url: &str, target: &Path) -> Result<Repository> {
    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_options());

    builder
        .clone(normalize_ssh_url(url).as_ref(), target)
        .map_err(|e| git_error::clone_failed(url, clone_reason(&e)))
}

/// Fetch `origin` for the current branch and fast-forward to it.
pub fn pull(path: &Path) -> Result<()> {
    let failed = |reason: String| git_error::pull_failed(path.display().to_string(), reason);
    let git_failed = |e: git2::Error| failed(pull_reason(&e));

    let repo = Repository::open(path)
        .map_err(|e| failed(stale_checkout(&format!("not a git checkout ({})", e.message()))))?;

    let branch = {
        let head = repo.head().map_err(git_failed)?;
        if !head.is_branch() {
            return Err(failed(stale_checkout("HEAD is detached")));
        }
        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| failed(stale_checkout("HEAD has no branch name")))?
    };

    let mut remote = repo.find_remote("origin").map_err(git_failed)?;
    remote
        .fetch(&[branch.as_str()], Some(&mut fetch_options()), None)
        .map_err(git_failed)?;

    let fetch_head = repo.find_reference("FETCH_HEAD").map_err(git_failed)?;
    let fetched = repo
        .reference_to_annotated_commit(&fetch_head)
        .map_err(git_failed)?;
    let (analysis, _) = repo.merge_analysis(&[&fetched]).map_err(git_failed)?;

    if analysis.is_up_to_date() {
        debug!(branch = %branch, "template checkout is up to date");
        return Ok(());
    }
    if !analysis.is_fast_forward() {
        return Err(failed(stale_checkout(
            "the checkout has diverged from the template",
        )));
    }

    let refname = format!("refs/heads/{branch}");
    let mut reference = repo.find_reference(&refname).map_err(git_failed)?;
    reference
        .set_target(fetched.id(), "template-sync: fast-forward")
        .map_err(git_failed)?;
    repo.set_head(&refname).map_err(git_failed)?;
    repo.checkout_head(Some(CheckoutBuilder::default().force()))
        .map_err(git_failed)?;

    debug!(branch = %branch, commit = %fetched.id(), "fast-forwarded template checkout");
    Ok(())
}

/// Stage every change under `root`, including deletions (`git add .`).
pub fn stage_all(root: &Path) -> Result<()> {
    let repo = Repository::discover(root).map_err(|_| SyncError::NotInGitRepository)?;
    let pathspec = pathspec_for(&repo, root);

    let mut index = repo.index()?;
    index.add_all([pathspec.as_str()], IndexAddOption::DEFAULT, None)?;
    index.update_all([pathspec.as_str()], None)?;
    index.write()?;

    debug!(root = %root.display(), pathspec = %pathspec, "staged changes");
    Ok(())
}

/// Pathspec covering `root` relative to the repository's working directory
fn pathspec_for(repo: &Repository, root: &Path) -> String {
    let prefix = repo.workdir().and_then(|workdir| {
        let workdir = dunce::canonicalize(workdir).ok()?;
        let root = dunce::canonicalize(root).ok()?;
        root.strip_prefix(&workdir)
            .ok()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
    });

    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}/*"),
        _ => "*".to_string(),
    }
}

fn fetch_options<'a>() -> FetchOptions<'a> {
    let mut callbacks = RemoteCallbacks::new();
    setup_auth_callbacks(&mut callbacks);

    let mut options = FetchOptions::new();
    options.remote_callbacks(callbacks);
    options
}

/// Set up authentication callbacks for git operations
fn setup_auth_callbacks(callbacks: &mut RemoteCallbacks) {
    callbacks.credentials(|url, username_from_url, allowed_types| {
        if allowed_types.contains(CredentialType::DEFAULT) {
            return Cred::default();
        }

        if allowed_types.contains(CredentialType::SSH_KEY) {
            if let Some(username) = username_from_url {
                return Cred::ssh_key_from_agent(username);
            }
        }

        if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
            if let Ok(config) = git2::Config::open_default() {
                if let Ok(cred) = Cred::credential_helper(&config, url, username_from_url) {
                    return Ok(cred);
                }
            }
            // Public repositories: let the server produce the real error.
            return Cred::userpass_plaintext("", "");
        }

        Err(git2::Error::new(
            git2::ErrorCode::Auth,
            git2::ErrorClass::Http,
            "authentication failed",
        ))
    });
}
