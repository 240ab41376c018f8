//! Runtime settings
//!
//! Every setting has a built-in default that targets the MetaMask module
//! template. Each can be overridden through an environment variable, which is
//! how the integration tests point the tool at a local template repository
//! and a stand-in package manager.

use std::env;
use std::path::PathBuf;

/// Upstream module template
pub const MODULE_TEMPLATE_URL: &str = "https://github.com/MetaMask/metamask-module-template.git";

/// Directory name of the template checkout under the system temp directory
pub const CHECKOUT_DIR_NAME: &str = "metamask-module-template";

#[cfg(windows)]
const FALLBACK_TEMP_DIR: &str = r"C:\Windows\Temp";
#[cfg(not(windows))]
const FALLBACK_TEMP_DIR: &str = "/tmp";

pub const URL_ENV: &str = "TEMPLATE_SYNC_URL";
pub const DIR_ENV: &str = "TEMPLATE_SYNC_DIR";
pub const YARN_ENV: &str = "TEMPLATE_SYNC_YARN";
pub const NODE_ENV: &str = "TEMPLATE_SYNC_NODE";

/// Resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Where the template is cloned from
    pub template_url: String,
    /// Where the template checkout lives; reused across runs
    pub template_dir: PathBuf,
    /// Package manager executable
    pub yarn: String,
    /// JavaScript runtime used to run pinned yarn releases
    pub node: String,
}

impl Settings {
    /// Resolve settings from the process environment
    pub fn from_env() -> Self {
        Self::resolve(|key| env::var(key).ok())
    }

    /// Resolve settings from an arbitrary variable lookup
    pub fn resolve<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // A relative TMPDIR would put the checkout inside the project itself.
        let template_dir = non_empty(DIR_ENV).map_or_else(
            || {
                Some(env::temp_dir())
                    .filter(|dir| dir.is_absolute())
                    .unwrap_or_else(|| PathBuf::from(FALLBACK_TEMP_DIR))
                    .join(CHECKOUT_DIR_NAME)
            },
            PathBuf::from,
        );

        Self {
            template_url: non_empty(URL_ENV).unwrap_or_else(|| MODULE_TEMPLATE_URL.to_string()),
            template_dir,
            yarn: non_empty(YARN_ENV).unwrap_or_else(|| "yarn".to_string()),
            node: non_empty(NODE_ENV).unwrap_or_else(|| "node".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(|_| None);
        assert_eq!(settings.template_url, MODULE_TEMPLATE_URL);
        assert!(settings.template_dir.ends_with(CHECKOUT_DIR_NAME));
        assert!(settings.template_dir.is_absolute());
        assert_eq!(settings.yarn, "yarn");
        assert_eq!(settings.node, "node");
    }

    #[test]
    fn test_env_overrides() {
        let settings = Settings::resolve(lookup_from(&[
            (URL_ENV, "/srv/template"),
            (DIR_ENV, "/work/checkout"),
            (YARN_ENV, "/opt/bin/yarn"),
            (NODE_ENV, "/opt/bin/node"),
        ]));
        assert_eq!(settings.template_url, "/srv/template");
        assert_eq!(settings.template_dir, PathBuf::from("/work/checkout"));
        assert_eq!(settings.yarn, "/opt/bin/yarn");
        assert_eq!(settings.node, "/opt/bin/node");
    }

    #[test]
    fn test_blank_override_falls_back_to_default() {
        let settings = Settings::resolve(lookup_from(&[(URL_ENV, "  ")]));
        assert_eq!(settings.template_url, MODULE_TEMPLATE_URL);
    }
}
