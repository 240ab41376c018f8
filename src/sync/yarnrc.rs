//! Yarn configuration reconciliation
//!
//! The local project ends up on the template's `.yarnrc.yml`, pinned to
//! whichever Yarn version is newer, with the template's plugins reinstalled.
//! `yarnPath` and `plugins` are dropped from the copied document because the
//! release bundle and plugin files they point at do not exist locally yet;
//! `yarn set version` and `yarn plugin import` write them back.

use std::fs;
use std::path::Path;

use semver::Version;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::{
    Result, config as config_error,
    fs::{self as fs_error, read_error, remove_error, write_error},
};
use crate::package_manager::release_path;

use super::SyncContext;

pub const CONFIG_FILE: &str = ".yarnrc.yml";
pub const LEGACY_CONFIG_FILE: &str = ".yarnrc";

const YARN_PATH_KEY: &str = "yarnPath";
const PLUGINS_KEY: &str = "plugins";

/// One entry of the `plugins` list
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PluginDescriptor {
    pub spec: String,
}

/// A validated `.yarnrc.yml`
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    mapping: Mapping,
    plugins: Vec<PluginDescriptor>,
}

impl ConfigDocument {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(fs_error::not_found(path.display().to_string()));
        }
        let content = fs::read_to_string(path).map_err(|e| read_error(path, &e))?;
        Self::parse(path, &content)
    }

    /// Parse and validate: a mapping whose `plugins` is a list of mappings
    /// with a string `spec`.
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let display = path.display().to_string();
        let value: Value = serde_yaml::from_str(content)
            .map_err(|e| config_error::parse_failed(&display, e.to_string()))?;

        let Value::Mapping(mapping) = value else {
            return Err(config_error::invalid(display, "expected a mapping"));
        };

        let plugins = match mapping.get(PLUGINS_KEY) {
            Some(Value::Sequence(entries)) => entries
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    serde_yaml::from_value::<PluginDescriptor>(entry.clone()).map_err(|_| {
                        config_error::invalid(
                            &display,
                            format!("plugins[{i}] must be a mapping with a string \"spec\""),
                        )
                    })
                })
                .collect::<Result<Vec<_>>>()?,
            Some(_) => return Err(config_error::invalid(display, "\"plugins\" must be a list")),
            None => return Err(config_error::invalid(display, "missing \"plugins\" list")),
        };

        Ok(Self { mapping, plugins })
    }

    pub fn plugins(&self) -> &[PluginDescriptor] {
        &self.plugins
    }

    /// The document without `yarnPath` and `plugins`
    pub fn reduced(&self) -> Mapping {
        let mut mapping = self.mapping.clone();
        mapping.remove(YARN_PATH_KEY);
        mapping.remove(PLUGINS_KEY);
        mapping
    }
}

/// The version the local project is pinned to: never lower than it was.
pub fn target_version(local: &Version, template: &Version) -> Version {
    local.max(template).clone()
}

/// Reconcile the local Yarn version, plugins and `.yarnrc.yml`.
pub fn update_yarn_config(ctx: &SyncContext<'_>) -> Result<()> {
    let template_version = ctx.package_manager.version(ctx.template_root)?;
    let local_version = ctx.package_manager.version(ctx.local_root)?;
    debug!(%template_version, %local_version, "yarn versions");

    let legacy = ctx.local_root.join(LEGACY_CONFIG_FILE);
    if legacy.exists() {
        if ctx.is_check() {
            ctx.reporter
                .warn("Legacy .yarnrc file found. It should be deleted.");
        } else {
            ctx.reporter.warn("Deleting legacy .yarnrc file.");
            fs::remove_file(&legacy).map_err(|e| remove_error(&legacy, &e))?;
        }
    }

    if ctx.is_check() {
        if local_version != template_version {
            ctx.reporter.warn(&format!(
                "The current version of Yarn ({local_version}) does not match the version used by the template ({template_version})."
            ));
        }
        return Ok(());
    }

    if local_version > template_version {
        ctx.reporter.warn(&format!(
            "The current version of Yarn ({local_version}) is newer than the version used by the template ({template_version})."
        ));
    }

    let template_config = ConfigDocument::load(&ctx.template_root.join(CONFIG_FILE))?;
    let target = target_version(&local_version, &template_version);

    let config_path = ctx.local_root.join(CONFIG_FILE);
    let reduced = serde_yaml::to_string(&Value::Mapping(template_config.reduced()))?;
    fs::write(&config_path, reduced).map_err(|e| write_error(&config_path, &e))?;
    debug!(path = %config_path.display(), "wrote reduced yarn config");

    ctx.package_manager.set_version(
        ctx.local_root,
        &release_path(ctx.template_root, &template_version),
        &target,
    )?;

    let local_release = release_path(ctx.local_root, &target);
    for plugin in template_config.plugins() {
        ctx.package_manager
            .import_plugin(ctx.local_root, &local_release, &plugin.spec)?;
    }

    Ok(())
}
