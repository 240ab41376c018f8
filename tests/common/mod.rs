//! Common test utilities for template-sync integration tests

use std::path::{Path, PathBuf};

use git2::{Commit, IndexAddOption, Repository, Signature};
use tempfile::TempDir;

/// An upstream template repository, a local project and a stand-in for yarn
#[allow(dead_code)]
pub struct TestWorkspace {
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Upstream template repository (cloned from)
    pub upstream: PathBuf,
    /// Where the template checkout goes
    pub checkout: PathBuf,
    /// The project being synchronized
    pub local: PathBuf,
    /// Shell script answering for both `yarn` and `node`
    pub tool: PathBuf,
}

impl TestWorkspace {
    /// Create a new workspace; the local project is a git repository.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let upstream = temp.path().join("upstream");
        let local = temp.path().join("local");
        let checkout = temp.path().join("checkout");
        std::fs::create_dir_all(&upstream).expect("Failed to create upstream directory");
        std::fs::create_dir_all(&local).expect("Failed to create local directory");
        Repository::init(&upstream).expect("Failed to init upstream repository");
        Repository::init(&local).expect("Failed to init local repository");

        let tool = temp.path().join("fake-yarn");
        write_tool(&tool, "3.2.1");

        Self {
            temp,
            upstream,
            checkout,
            local,
            tool,
        }
    }

    /// Write a file in the upstream template
    pub fn write_template(&self, path: &str, content: &str) {
        write(&self.upstream.join(path), content);
    }

    /// Write a file in the local project
    pub fn write_local(&self, path: &str, content: &str) {
        write(&self.local.join(path), content);
    }

    /// Read a file from the local project
    pub fn read_local(&self, path: &str) -> String {
        std::fs::read_to_string(self.local.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in the local project
    pub fn local_exists(&self, path: &str) -> bool {
        self.local.join(path).exists()
    }

    /// Commit everything in the upstream template
    pub fn commit_template(&self, message: &str) {
        commit_all(&self.upstream, message);
    }

    /// Whether `path` is staged in the local repository's index
    pub fn is_staged(&self, path: &str) -> bool {
        let repo = Repository::open(&self.local).expect("Failed to open local repository");
        let index = repo.index().expect("Failed to open index");
        index.get_path(Path::new(path), 0).is_some()
    }

    /// A command for the real binary, pointed at this workspace
    pub fn command(&self) -> assert_cmd::Command {
        #[allow(deprecated)]
        let mut cmd = assert_cmd::Command::cargo_bin("template-sync")
            .expect("Failed to find template-sync binary");
        cmd.current_dir(&self.local)
            .env("TEMPLATE_SYNC_URL", self.upstream.display().to_string())
            .env("TEMPLATE_SYNC_DIR", &self.checkout)
            .env("TEMPLATE_SYNC_YARN", &self.tool)
            .env("TEMPLATE_SYNC_NODE", &self.tool)
            .env_remove("TEMPLATE_SYNC_LOG");
        cmd
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

/// A script that prints `version` for `--version` and succeeds otherwise
fn write_tool(path: &Path, version: &str) {
    write(
        path,
        &format!("#!/bin/sh\nif [ \"$1\" = \"--version\" ]; then\n  echo {version}\nfi\nexit 0\n"),
    );
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make script executable");
    }
}

fn commit_all(path: &Path, message: &str) {
    let repo = Repository::open(path).expect("Failed to open repository");
    let mut index = repo.index().expect("Failed to open index");
    index
        .add_all(["*"], IndexAddOption::DEFAULT, None)
        .expect("Failed to add files");
    index.write().expect("Failed to write index");

    let tree_id = index.write_tree().expect("Failed to write tree");
    let tree = repo.find_tree(tree_id).expect("Failed to find tree");
    let signature =
        Signature::now("template-sync", "tests@example.com").expect("Failed to create signature");
    let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<&Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .expect("Failed to commit");
}
