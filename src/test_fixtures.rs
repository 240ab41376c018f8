//! Test fixtures shared by the unit tests.
//!
//! - Temp directories and git repositories with a single call
//! - [`TestHarness`]: a template root and a local root plus recording
//!   stand-ins for every collaborator a [`SyncContext`] needs
//!
//! ```ignore
//! let harness = TestHarness::new(RunMode::Write);
//! harness.prompt.answer(Resolution::Overwrite);
//! process_template_files(&harness.context(), &IgnoreFilter::static_only())?;
//! assert_eq!(harness.reporter.infos().len(), 1);
//! ```

#![allow(clippy::expect_used)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use git2::{Commit, IndexAddOption, Repository, Signature};
use semver::Version;
use tempfile::TempDir;

use crate::error::{Result, SyncError, tool};
use crate::git::DiffViewer;
use crate::package_manager::PackageManager;
use crate::sync::{Resolution, RunMode, SyncContext};
use crate::ui::{ProgressReporter, Prompt};

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Create a temp directory with a git repository initialized.
///
/// # Panics
///
/// Panics if the temp directory or git repository cannot be created.
#[must_use]
pub fn create_git_repo() -> (TempDir, PathBuf) {
    let temp = create_temp_dir();
    let path = temp.path().to_path_buf();
    Repository::init(&path).expect("Failed to init git repository");
    (temp, path)
}

/// Commit every file in the working directory on top of HEAD.
///
/// # Panics
///
/// Panics if any git step fails.
pub fn commit_all(path: &Path, message: &str) {
    let repo = Repository::open(path).expect("Failed to open repository");
    let mut index = repo.index().expect("Failed to open index");
    index
        .add_all(["*"], IndexAddOption::DEFAULT, None)
        .expect("Failed to add files");
    index.update_all(["*"], None).expect("Failed to update index");
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

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Info(String),
    Warn(String),
}

/// Records everything reported instead of drawing it.
#[derive(Default)]
pub struct RecordingReporter {
    lines: RefCell<Vec<Line>>,
    tasks: RefCell<Vec<String>>,
    paused: Cell<bool>,
    pauses: Cell<usize>,
    finished: RefCell<Option<String>>,
}

impl RecordingReporter {
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .map(|line| match line {
                Line::Info(text) | Line::Warn(text) => text.clone(),
            })
            .collect()
    }

    pub fn infos(&self) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter_map(|line| match line {
                Line::Info(text) => Some(text.clone()),
                Line::Warn(_) => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.lines
            .borrow()
            .iter()
            .filter_map(|line| match line {
                Line::Warn(text) => Some(text.clone()),
                Line::Info(_) => None,
            })
            .collect()
    }

    pub fn tasks(&self) -> Vec<String> {
        self.tasks.borrow().clone()
    }

    pub fn is_paused(&self) -> bool {
        self.paused.get()
    }

    pub fn pause_count(&self) -> usize {
        self.pauses.get()
    }

    pub fn finished(&self) -> Option<String> {
        self.finished.borrow().clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn set_task(&self, title: &str) {
        self.tasks.borrow_mut().push(title.to_string());
    }

    fn info(&self, message: &str) {
        self.lines.borrow_mut().push(Line::Info(message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.lines.borrow_mut().push(Line::Warn(message.to_string()));
    }

    fn pause(&self) {
        assert!(!self.paused.get(), "paused twice");
        self.paused.set(true);
        self.pauses.set(self.pauses.get() + 1);
    }

    fn resume(&self) {
        self.paused.set(false);
    }

    fn finish(&self, message: &str) {
        *self.finished.borrow_mut() = Some(message.to_string());
    }

    fn abandon(&self) {}

    fn warning_count(&self) -> usize {
        self.warnings().len()
    }
}

/// Answers prompts from a queue; an empty queue fails the prompt.
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: RefCell<VecDeque<Resolution>>,
    messages: RefCell<Vec<String>>,
    choices: RefCell<Vec<Vec<Resolution>>>,
}

impl ScriptedPrompt {
    pub fn answer(&self, resolution: Resolution) -> &Self {
        self.answers.borrow_mut().push_back(resolution);
        self
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn choices(&self) -> Vec<Vec<Resolution>> {
        self.choices.borrow().clone()
    }
}

impl Prompt for ScriptedPrompt {
    fn choose(&self, message: &str, choices: &[Resolution]) -> Result<Resolution> {
        self.messages.borrow_mut().push(message.to_string());
        self.choices.borrow_mut().push(choices.to_vec());

        let answer = self
            .answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| SyncError::PromptFailed {
                message: format!("no scripted answer for {message:?}"),
            })?;
        assert!(
            choices.contains(&answer),
            "{answer} is not one of {choices:?}"
        );
        Ok(answer)
    }
}

/// Remembers which file pairs were diffed.
#[derive(Default)]
pub struct FakeDiff {
    shown: RefCell<Vec<(PathBuf, PathBuf)>>,
}

impl FakeDiff {
    pub fn shown(&self) -> Vec<(PathBuf, PathBuf)> {
        self.shown.borrow().clone()
    }
}

impl DiffViewer for FakeDiff {
    fn show(&self, template: &Path, local: &Path) -> Result<()> {
        self.shown
            .borrow_mut()
            .push((template.to_path_buf(), local.to_path_buf()));
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageManagerCall {
    Install {
        dir: PathBuf,
    },
    LintFix {
        dir: PathBuf,
    },
    SetVersion {
        dir: PathBuf,
        executable: PathBuf,
        version: Version,
    },
    ImportPlugin {
        dir: PathBuf,
        executable: PathBuf,
        spec: String,
    },
}

/// Reports configured versions per directory and records every other call.
#[derive(Default)]
pub struct FakePackageManager {
    versions: RefCell<HashMap<PathBuf, Version>>,
    calls: RefCell<Vec<PackageManagerCall>>,
}

impl FakePackageManager {
    pub fn set_version_for(&self, dir: &Path, version: Version) {
        self.versions.borrow_mut().insert(dir.to_path_buf(), version);
    }

    pub fn calls(&self) -> Vec<PackageManagerCall> {
        self.calls.borrow().clone()
    }
}

impl PackageManager for FakePackageManager {
    fn version(&self, dir: &Path) -> Result<Version> {
        self.versions
            .borrow()
            .get(dir)
            .cloned()
            .ok_or_else(|| tool::command_failed("yarn --version", "no version configured"))
    }

    fn install(&self, dir: &Path) -> Result<()> {
        self.calls.borrow_mut().push(PackageManagerCall::Install {
            dir: dir.to_path_buf(),
        });
        Ok(())
    }

    fn lint_fix(&self, dir: &Path) {
        self.calls.borrow_mut().push(PackageManagerCall::LintFix {
            dir: dir.to_path_buf(),
        });
    }

    fn set_version(&self, dir: &Path, executable: &Path, version: &Version) -> Result<()> {
        self.calls.borrow_mut().push(PackageManagerCall::SetVersion {
            dir: dir.to_path_buf(),
            executable: executable.to_path_buf(),
            version: version.clone(),
        });
        Ok(())
    }

    fn import_plugin(&self, dir: &Path, executable: &Path, spec: &str) -> Result<()> {
        self.calls.borrow_mut().push(PackageManagerCall::ImportPlugin {
            dir: dir.to_path_buf(),
            executable: executable.to_path_buf(),
            spec: spec.to_string(),
        });
        Ok(())
    }
}

/// A template root, a local root and fakes for every collaborator
pub struct TestHarness {
    _temp: TempDir,
    template: PathBuf,
    local: PathBuf,
    pub mode: RunMode,
    pub reporter: RecordingReporter,
    pub prompt: ScriptedPrompt,
    pub diff: FakeDiff,
    pub package_manager: FakePackageManager,
}

impl TestHarness {
    /// # Panics
    ///
    /// Panics if the directories cannot be created.
    #[must_use]
    pub fn new(mode: RunMode) -> Self {
        let temp = create_temp_dir();
        let template = temp.path().join("template");
        let local = temp.path().join("local");
        std::fs::create_dir_all(&template).expect("Failed to create template root");
        std::fs::create_dir_all(&local).expect("Failed to create local root");

        Self {
            _temp: temp,
            template,
            local,
            mode,
            reporter: RecordingReporter::default(),
            prompt: ScriptedPrompt::default(),
            diff: FakeDiff::default(),
            package_manager: FakePackageManager::default(),
        }
    }

    pub fn template(&self) -> &Path {
        &self.template
    }

    pub fn local(&self) -> &Path {
        &self.local
    }

    pub fn context(&self) -> SyncContext<'_> {
        SyncContext {
            mode: self.mode,
            template_root: &self.template,
            local_root: &self.local,
            reporter: &self.reporter,
            prompt: &self.prompt,
            diff: &self.diff,
            package_manager: &self.package_manager,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_git_repo() {
        let (temp, path) = create_git_repo();
        assert!(path.join(".git").exists());
        assert!(temp.path().exists());
    }

    #[test]
    fn test_commit_all_stacks_commits() {
        let (_temp, path) = create_git_repo();
        std::fs::write(path.join("a.txt"), "a").unwrap();
        commit_all(&path, "first");
        std::fs::write(path.join("b.txt"), "b").unwrap();
        commit_all(&path, "second");

        let repo = Repository::open(&path).unwrap();
        let head = repo.head().unwrap().peel_to_commit().unwrap();
        assert_eq!(head.message(), Some("second"));
        assert_eq!(head.parent_count(), 1);
    }

    #[test]
    fn test_scripted_prompt_runs_dry() {
        let prompt = ScriptedPrompt::default();
        prompt.answer(Resolution::Skip);
        assert_eq!(
            prompt.choose("q", &[Resolution::Skip]).unwrap(),
            Resolution::Skip
        );
        assert!(prompt.choose("q", &[Resolution::Skip]).is_err());
    }
}
