//! External package-manager invocations
//!
//! The reconcilers only talk to [`PackageManager`]; [`Yarn`] shells out to
//! the real tools. Output is captured, never streamed, so the spinner keeps
//! the terminal.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use semver::Version;
use tracing::debug;

use crate::config::Settings;
use crate::error::{Result, tool};

pub trait PackageManager {
    /// Version reported by the package manager when run inside `dir`
    fn version(&self, dir: &Path) -> Result<Version>;

    /// Install dependencies in `dir`
    fn install(&self, dir: &Path) -> Result<()>;

    /// Run the project's `lint:fix` script. Failures are only logged.
    fn lint_fix(&self, dir: &Path);

    /// Pin `dir` to `version`, using the release bundle at `executable`
    fn set_version(&self, dir: &Path, executable: &Path, version: &Version) -> Result<()>;

    /// Import a Yarn plugin into `dir`, using the release bundle at `executable`
    fn import_plugin(&self, dir: &Path, executable: &Path, spec: &str) -> Result<()>;
}

/// Location of the pinned Yarn release bundle for `version` under `root`
pub fn release_path(root: &Path, version: &Version) -> PathBuf {
    root.join(".yarn")
        .join("releases")
        .join(format!("yarn-{version}.cjs"))
}

/// Yarn, with pinned releases run through node
#[derive(Debug, Clone)]
pub struct Yarn {
    program: String,
    node: String,
}

impl Yarn {
    pub fn new(settings: &Settings) -> Self {
        Self {
            program: settings.yarn.clone(),
            node: settings.node.clone(),
        }
    }

    fn run<I, S>(&self, program: &str, args: I, dir: &Path) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<S> = args.into_iter().collect();
        let command_line = std::iter::once(program.to_string())
            .chain(args.iter().map(|a| a.as_ref().to_string_lossy().into_owned()))
            .collect::<Vec<_>>()
            .join(" ");
        debug!(command = %command_line, dir = %dir.display(), "running");

        let output = Command::new(program)
            .args(&args)
            .current_dir(dir)
            .output()
            .map_err(|e| tool::command_failed(&command_line, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let reason = if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                stderr
            };
            return Err(tool::command_failed(command_line, reason));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl PackageManager for Yarn {
    fn version(&self, dir: &Path) -> Result<Version> {
        let output = self.run(&self.program, ["--version"], dir)?;
        let reported = output.trim();
        Version::parse(reported)
            .map_err(|_| tool::version_invalid(dir.display().to_string(), reported))
    }

    fn install(&self, dir: &Path) -> Result<()> {
        self.run(&self.program, std::iter::empty::<&str>(), dir)
            .map(|_| ())
    }

    fn lint_fix(&self, dir: &Path) {
        if let Err(e) = self.run(&self.program, ["lint:fix"], dir) {
            debug!(error = %e, "lint:fix failed, ignoring");
        }
    }

    fn set_version(&self, dir: &Path, executable: &Path, version: &Version) -> Result<()> {
        let version = version.to_string();
        self.run(
            &self.node,
            [
                executable.as_os_str(),
                OsStr::new("set"),
                OsStr::new("version"),
                OsStr::new(&version),
            ],
            dir,
        )
        .map(|_| ())
    }

    fn import_plugin(&self, dir: &Path, executable: &Path, spec: &str) -> Result<()> {
        self.run(
            &self.node,
            [
                executable.as_os_str(),
                OsStr::new("plugin"),
                OsStr::new("import"),
                OsStr::new(spec),
            ],
            dir,
        )
        .map(|_| ())
    }
}
