//! CLI definitions using clap derive API

use clap::Parser;
use clap::builder::{Styles, styling::AnsiColor};

use crate::sync::RunMode;

/// template-sync - keep a module in sync with its template
///
/// Synchronise the module template with the current project.
#[derive(Parser, Debug)]
#[command(
    name = "template-sync",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Synchronise the module template with the current project.",
    long_about = "Fetches the module template and reconciles the current project with it: \
                  files are copied or offered for overwrite, package.json dependencies and \
                  scripts are brought up to date, and the pinned Yarn version and plugins are \
                  updated. Run with --check to only report drift.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  template-sync\n    \
                  template-sync --check"
)]
pub struct Cli {
    /// Whether to only check for changes compared to the template. When this
    /// is enabled, no files will be modified.
    #[arg(long, short = 'c')]
    pub check: bool,
}

impl Cli {
    pub fn mode(&self) -> RunMode {
        if self.check {
            RunMode::Check
        } else {
            RunMode::Write
        }
    }
}
