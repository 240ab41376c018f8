//! Sync command implementation
//!
//! The sync process:
//! 1. Fetch the module template (clone, or pull an existing checkout)
//! 2. Update the Yarn version, plugins and `.yarnrc.yml`
//! 3. Process template files
//! 4. Process `package.json`
//! 5. Install dependencies (write mode)
//! 6. Format files with `lint:fix` (write mode, best effort)
//! 7. Check for local files the template does not have
//! 8. Stage all changes in git (write mode)
//!
//! A failing step stops the run; nothing is rolled back.

use std::path::Path;

use tracing::debug;

use crate::cli::Cli;
use crate::config::Settings;
use crate::error::Result;
use crate::git::{self, GitDiff};
use crate::package_manager::Yarn;
use crate::sync::walk::IgnoreFilter;
use crate::sync::{RunMode, SyncContext, files, manifest, yarnrc};
use crate::ui::{InquirePrompt, ProgressReporter, SpinnerReporter};

/// Run the sync against the project at `local_root`.
pub fn run(cli: &Cli, local_root: &Path) -> Result<()> {
    let settings = Settings::from_env();
    debug!(?settings, root = %local_root.display(), "resolved settings");

    let reporter = SpinnerReporter::new("Fetching module template");
    let yarn = Yarn::new(&settings);
    let ctx = SyncContext {
        mode: cli.mode(),
        template_root: &settings.template_dir,
        local_root,
        reporter: &reporter,
        prompt: &InquirePrompt,
        diff: &GitDiff,
        package_manager: &yarn,
    };

    conclude(&reporter, ctx.mode, sync(&ctx, &settings.template_url))
}

/// Close the progress display with the summary line, or abandon it on error.
fn conclude(reporter: &dyn ProgressReporter, mode: RunMode, outcome: Result<()>) -> Result<()> {
    match outcome {
        Ok(()) => {
            reporter.finish(&summary(mode, reporter.warning_count()));
            Ok(())
        }
        Err(e) => {
            reporter.abandon();
            Err(e)
        }
    }
}

/// Every task of a run, in order.
pub fn sync(ctx: &SyncContext<'_>, template_url: &str) -> Result<()> {
    ctx.reporter.set_task("Fetching module template");
    git::fetch_template(template_url, ctx.template_root)?;

    ctx.reporter.set_task("Updating Yarn configuration");
    yarnrc::update_yarn_config(ctx)?;

    let filter = IgnoreFilter::for_project(ctx.local_root);

    ctx.reporter.set_task("Processing files");
    files::process_template_files(ctx, &filter)?;

    ctx.reporter.set_task("Processing package.json");
    manifest::process_package_json(ctx)?;

    if !ctx.is_check() {
        ctx.reporter.set_task("Installing dependencies");
        ctx.package_manager.install(ctx.local_root)?;

        ctx.reporter.set_task("Formatting files");
        ctx.package_manager.lint_fix(ctx.local_root);
    }

    ctx.reporter.set_task("Checking for extra files");
    files::check_local_files(ctx, &filter)?;

    if !ctx.is_check() {
        ctx.reporter.set_task("Adding files to git");
        git::stage_all(ctx.local_root)?;
    }

    Ok(())
}

/// Closing line of a successful run
pub fn summary(mode: RunMode, warnings: usize) -> String {
    match (mode, warnings) {
        (RunMode::Write, _) => "Done!".to_string(),
        (RunMode::Check, 0) => "Done! The project matches the template.".to_string(),
        (RunMode::Check, 1) => "Done! Found 1 difference from the template.".to_string(),
        (RunMode::Check, n) => format!("Done! Found {n} differences from the template."),
    }
}
