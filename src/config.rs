use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReleaseActionError, Result};

/// File name searched for under the workspace's `.github` directory and the user config directory.
pub const CONFIG_FILE_NAME: &str = "release-actions.toml";

/// Represents the complete configuration for release-actions.
///
/// Everything here has a default, so the file is optional.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub breaking_changes: BreakingChangesConfig,

    #[serde(default)]
    pub github: GithubConfig,
}

fn default_marker() -> String {
    "Upgrade from v".to_string()
}

fn default_docs_dir() -> String {
    "docs/breaking-changes".to_string()
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

/// Settings for the breaking change doc check.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BreakingChangesConfig {
    /// Substring identifying comments previously posted by this action
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Directory, relative to the workspace, holding `v{major}.md` docs
    #[serde(default = "default_docs_dir")]
    pub docs_dir: String,

    /// Template path relative to the parent of the action install root
    #[serde(default)]
    pub template: Option<String>,
}

impl Default for BreakingChangesConfig {
    fn default() -> Self {
        BreakingChangesConfig {
            marker: default_marker(),
            docs_dir: default_docs_dir(),
            template: None,
        }
    }
}

impl BreakingChangesConfig {
    /// Resolves the fallback template for an action installed at `action_path`.
    pub fn template_path(&self, action_path: &Path) -> PathBuf {
        let parent = action_path.join("..");
        match &self.template {
            Some(template) => parent.join(template),
            None => parent.join("templates").join("breaking-changes.md"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GithubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        GithubConfig {
            api_url: default_api_url(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `.github/release-actions.toml` in the workspace
/// 3. `release-actions.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
/// * `workspace` - Workspace root of the checked out repository
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>, workspace: &Path) -> Result<Config> {
    let workspace_config = workspace.join(".github").join(CONFIG_FILE_NAME);

    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if workspace_config.exists() {
        workspace_config
    } else if let Some(config_dir) = dirs::config_dir() {
        let user_config = config_dir.join(CONFIG_FILE_NAME);
        if user_config.exists() {
            user_config
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    tracing::debug!("Loading configuration from {}", path.display());
    let config_str = fs::read_to_string(&path).map_err(|e| {
        ReleaseActionError::config(format!("cannot read {}: {}", path.display(), e))
    })?;

    toml::from_str(&config_str).map_err(|e| {
        ReleaseActionError::config(format!("cannot parse {}: {}", path.display(), e))
    })
}
