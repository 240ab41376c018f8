//! `package.json` reconciliation
//!
//! Dependencies are raised to the template's range when they are missing or
//! older than anything the template range admits; they are never lowered.
//! The template decides which scripts exist, but local-only scripts are kept
//! and differing ones are the operator's call.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{
    Result, config as config_error,
    fs::{self as fs_error, read_error, write_error},
};

use super::version::is_outdated;
use super::{Resolution, SyncContext};

pub const MANIFEST_FILE: &str = "package.json";

/// The dependency maps that are reconciled, in processing order
pub const DEPENDENCY_SECTIONS: &[&str] = &[
    "dependencies",
    "devDependencies",
    "optionalDependencies",
    "peerDependencies",
];

const SCRIPTS: &str = "scripts";

const SCRIPT_CHOICES: &[Resolution] = &[Resolution::Skip, Resolution::Overwrite];

/// A parsed `package.json`, key order preserved
#[derive(Debug, Clone)]
pub struct ManifestDocument {
    path: PathBuf,
    root: Map<String, Value>,
}

/// A template dependency the current manifest lags behind on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyUpdate {
    pub section: &'static str,
    pub name: String,
    /// `None` when the dependency is missing from the section
    pub current: Option<String>,
    pub range: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptDrift {
    Missing { name: String, script: String },
    Mismatched { name: String, current: String, script: String },
}

impl ManifestDocument {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(fs_error::not_found(path.display().to_string()));
        }
        let content = fs::read_to_string(path).map_err(|e| read_error(path, &e))?;
        Self::parse(path, &content)
    }

    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let display = path.display().to_string();
        let value: Value = serde_json::from_str(content)
            .map_err(|e| config_error::parse_failed(&display, e.to_string()))?;

        match value {
            Value::Object(root) => Ok(Self {
                path: path.to_path_buf(),
                root,
            }),
            _ => Err(config_error::manifest_invalid(
                display,
                "expected a JSON object at the top level",
            )),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A string map such as `dependencies` or `scripts`, if present.
    pub fn string_map(&self, key: &str) -> Result<Option<Vec<(&str, &str)>>> {
        let Some(value) = self.root.get(key) else {
            return Ok(None);
        };
        let Value::Object(map) = value else {
            return Err(self.invalid(format!("\"{key}\" must be an object")));
        };

        map.iter()
            .map(|(name, value)| match value {
                Value::String(text) => Ok((name.as_str(), text.as_str())),
                _ => Err(self.invalid(format!("\"{key}.{name}\" must be a string"))),
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    fn get_string(&self, key: &str, name: &str) -> Option<&str> {
        self.root.get(key)?.as_object()?.get(name)?.as_str()
    }

    /// Set `key.name`, creating the `key` map if it is absent.
    pub fn set_string(&mut self, key: &str, name: &str, value: &str) {
        let entry = self
            .root
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(map) = entry {
            map.insert(name.to_string(), Value::String(value.to_string()));
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.root.contains_key(key)
    }

    /// Two-space indented JSON with a trailing newline
    pub fn to_pretty_string(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(&self.root)?;
        text.push('\n');
        Ok(text)
    }

    pub fn save(&self) -> Result<()> {
        let text = self.to_pretty_string()?;
        fs::write(&self.path, text).map_err(|e| write_error(&self.path, &e))?;
        debug!(path = %self.path.display(), "wrote manifest");
        Ok(())
    }

    fn invalid(&self, message: String) -> crate::error::SyncError {
        config_error::manifest_invalid(self.path.display().to_string(), message)
    }
}

/// Template dependencies that are missing or outdated in `current`.
///
/// Only sections both documents define are compared.
pub fn outdated_dependencies(
    current: &ManifestDocument,
    template: &ManifestDocument,
) -> Result<Vec<DependencyUpdate>> {
    let mut updates = Vec::new();

    for &section in DEPENDENCY_SECTIONS {
        let (Some(_), Some(template_deps)) =
            (current.string_map(section)?, template.string_map(section)?)
        else {
            continue;
        };

        for (name, range) in template_deps {
            let current_range = current.get_string(section, name);
            let outdated = match current_range {
                None => true,
                Some(current_range) => is_outdated(current_range, range),
            };
            if outdated {
                updates.push(DependencyUpdate {
                    section,
                    name: name.to_string(),
                    current: current_range.map(str::to_string),
                    range: range.to_string(),
                });
            }
        }
    }

    Ok(updates)
}

/// Template scripts that are missing from or differ in `current`.
pub fn script_drift(
    current: &ManifestDocument,
    template: &ManifestDocument,
) -> Result<Vec<ScriptDrift>> {
    let Some(template_scripts) = template.string_map(SCRIPTS)? else {
        return Ok(Vec::new());
    };
    // Validates the local map even though lookups go through get_string.
    current.string_map(SCRIPTS)?;

    Ok(template_scripts
        .into_iter()
        .filter_map(|(name, script)| match current.get_string(SCRIPTS, name) {
            None => Some(ScriptDrift::Missing {
                name: name.to_string(),
                script: script.to_string(),
            }),
            Some(existing) if existing != script => Some(ScriptDrift::Mismatched {
                name: name.to_string(),
                current: existing.to_string(),
                script: script.to_string(),
            }),
            Some(_) => None,
        })
        .collect())
}

/// Reconcile `current` against `template`. Returns the number of changes
/// applied to `current`, which is always zero in check mode.
pub fn reconcile(
    ctx: &SyncContext<'_>,
    current: &mut ManifestDocument,
    template: &ManifestDocument,
) -> Result<usize> {
    let mut changes = 0;

    for update in outdated_dependencies(current, template)? {
        if ctx.is_check() {
            let state = if update.current.is_some() {
                "is outdated"
            } else {
                "is missing"
            };
            ctx.reporter.warn(&format!(
                "Dependency \"{}\" {state}, should be \"{}\".",
                update.name, update.range
            ));
        } else {
            ctx.reporter.info(&format!(
                "Updating dependency \"{}\" to \"{}\".",
                update.name, update.range
            ));
            current.set_string(update.section, &update.name, &update.range);
            changes += 1;
        }
    }

    let drift = script_drift(current, template)?;
    if !ctx.is_check() && template.has(SCRIPTS) && !current.has(SCRIPTS) {
        current.root.insert(SCRIPTS.to_string(), Value::Object(Map::new()));
        changes += 1;
    }

    for item in drift {
        match item {
            ScriptDrift::Missing { name, script } => {
                if ctx.is_check() {
                    ctx.reporter
                        .warn(&format!("Script \"{name}\" is missing, should be \"{script}\"."));
                } else {
                    ctx.reporter.info(&format!("Adding script \"{name}\"."));
                    current.set_string(SCRIPTS, &name, &script);
                    changes += 1;
                }
            }
            ScriptDrift::Mismatched {
                name,
                current: existing,
                script,
            } => {
                if ctx.is_check() {
                    ctx.reporter.warn(&format!(
                        "Script \"{name}\" does not match the template: is \"{existing}\", should be \"{script}\"."
                    ));
                    continue;
                }

                let message = format!(
                    "Local \"{name}\" script does not match the template. What do you want to do?"
                );
                match ctx.ask(&message, SCRIPT_CHOICES)? {
                    Resolution::Overwrite => {
                        ctx.reporter.info(&format!("Overwriting script \"{name}\"."));
                        current.set_string(SCRIPTS, &name, &script);
                        changes += 1;
                    }
                    _ => ctx
                        .reporter
                        .warn(&format!("Not overwriting \"{name}\" script.")),
                }
            }
        }
    }

    Ok(changes)
}

/// Reconcile the local `package.json` with the template's.
pub fn process_package_json(ctx: &SyncContext<'_>) -> Result<()> {
    let mut current = ManifestDocument::load(&ctx.local_root.join(MANIFEST_FILE))?;
    let template = ManifestDocument::load(&ctx.template_root.join(MANIFEST_FILE))?;

    let changes = reconcile(ctx, &mut current, &template)?;
    if changes > 0 {
        current.save()?;
    } else {
        debug!(path = %current.path().display(), "manifest unchanged");
    }
    Ok(())
}
