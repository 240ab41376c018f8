//! UI/Progress presentation layer
//!
//! This module handles:
//! - The spinner shown while tasks run (indicatif)
//! - Styled info and warning lines (console)
//! - Interactive prompts (see [`prompt`])
//!
//! All operator output goes through the [`ProgressReporter`] trait so the
//! reconcilers never write to the terminal directly. The spinner must be
//! paused while a prompt or a diff owns the terminal; use [`paused`] for that.

pub mod prompt;

use std::cell::{Cell, RefCell};
use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

pub use prompt::{InquirePrompt, Prompt};

/// Progress reporter for the sync pipeline
pub trait ProgressReporter {
    /// Show the title of the task that is running now
    fn set_task(&self, title: &str);

    /// Report an action that was taken
    fn info(&self, message: &str);

    /// Report drift that was not resolved automatically
    fn warn(&self, message: &str);

    /// Stop redrawing so a prompt or diff can use the terminal
    fn pause(&self);

    /// Undo [`ProgressReporter::pause`]
    fn resume(&self);

    /// Finish successfully
    fn finish(&self, message: &str);

    /// Abandon on error
    fn abandon(&self);

    /// Number of warnings reported so far
    fn warning_count(&self) -> usize;
}

/// Run `f` with the reporter paused, resuming afterwards even if `f` failed.
pub fn paused<T>(reporter: &dyn ProgressReporter, f: impl FnOnce() -> T) -> T {
    reporter.pause();
    let result = f();
    reporter.resume();
    result
}

/// Interactive reporter with a spinner on stderr and report lines on stdout
pub struct SpinnerReporter {
    spinner: RefCell<Option<ProgressBar>>,
    title: RefCell<String>,
    warnings: Cell<usize>,
}

impl SpinnerReporter {
    pub fn new(title: &str) -> Self {
        Self {
            spinner: RefCell::new(Some(new_spinner(title))),
            title: RefCell::new(title.to_string()),
            warnings: Cell::new(0),
        }
    }

    fn print(&self, line: &str) {
        match self.spinner.borrow().as_ref() {
            Some(spinner) => spinner.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }
}

fn new_spinner(message: &str) -> ProgressBar {
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

impl ProgressReporter for SpinnerReporter {
    fn set_task(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
        if let Some(spinner) = self.spinner.borrow().as_ref() {
            spinner.set_message(title.to_string());
        }
    }

    fn info(&self, message: &str) {
        self.print(&Style::new().dim().apply_to(message).to_string());
    }

    fn warn(&self, message: &str) {
        self.warnings.set(self.warnings.get() + 1);
        self.print(&format!("{} {message}", Style::new().yellow().apply_to("⚠")));
    }

    fn pause(&self) {
        if let Some(spinner) = self.spinner.borrow_mut().take() {
            spinner.finish_and_clear();
        }
    }

    fn resume(&self) {
        let mut spinner = self.spinner.borrow_mut();
        if spinner.is_none() {
            *spinner = Some(new_spinner(&self.title.borrow()));
        }
    }

    fn finish(&self, message: &str) {
        self.pause();
        println!("{} {message}", Style::new().green().apply_to("✔"));
    }

    fn abandon(&self) {
        if let Some(spinner) = self.spinner.borrow_mut().take() {
            spinner.abandon();
        }
    }

    fn warning_count(&self) -> usize {
        self.warnings.get()
    }
}
