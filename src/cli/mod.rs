//! Command line surface
//!
//! Every input can come from a flag or from the environment variable the
//! action metadata exports, so the binary runs the same locally and in CI.

pub mod orchestration;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "release-actions",
    version,
    about = "Release pipeline steps: breaking change doc gate and semantic-release wrapper"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Require a breaking change doc on pull requests that bump the major version
    ValidateBreakingDoc(ValidateBreakingDocArgs),
    /// Install and run semantic-release, exposing its result as step outputs
    SemanticRelease(SemanticReleaseArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ValidateBreakingDocArgs {
    /// Version of the last release (e.g. 1.4.2)
    #[arg(long, env = "BREAKING_ACTION_LAST_RELEASE_VERSION", default_value = "")]
    pub last_release_version: String,

    /// Version the release step computed for this pull request
    #[arg(long, env = "BREAKING_ACTION_NEW_RELEASE_VERSION")]
    pub new_release_version: String,

    /// Repository as owner/name
    #[arg(long, env = "BREAKING_ACTION_REPO")]
    pub repo: String,

    /// Pull request number
    #[arg(long, env = "BREAKING_ACTION_PULL_REQUEST_ID")]
    pub pull_request_id: String,

    /// Token used for the GitHub API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: String,

    /// Root of the checked out repository
    #[arg(long, env = "GITHUB_WORKSPACE", default_value = ".")]
    pub workspace: PathBuf,

    /// Directory the action is installed in
    #[arg(long, env = "GITHUB_ACTION_PATH", default_value = ".")]
    pub action_path: PathBuf,

    /// GitHub API base URL (overrides the config file)
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// Custom configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SemanticReleaseArgs {
    /// Branches to release from, as a name or a JSON array
    #[arg(long, env = "SEMANTIC_ACTION_BRANCHES")]
    pub branches: Option<String>,

    /// Run in CI mode
    #[arg(long, env = "SEMANTIC_ACTION_CI")]
    pub ci: bool,

    /// Compute the release without publishing it
    #[arg(long, env = "SEMANTIC_ACTION_DRY_RUN")]
    pub dry_run: bool,

    /// Extra npm packages to install, separated by spaces or newlines
    #[arg(long, env = "SEMANTIC_ACTION_EXTRA_PLUGINS", default_value = "")]
    pub extra_plugins: String,

    /// semantic-release version to install
    #[arg(long, env = "SEMANTIC_ACTION_SEMANTIC_VERSION")]
    pub semantic_version: Option<String>,

    /// Directory npm installs into and semantic-release runs from
    #[arg(long, env = "GITHUB_ACTION_PATH", default_value = ".")]
    pub install_dir: PathBuf,
}

/// True when the runner asked for debug logging (`RUNNER_DEBUG=1`).
pub fn runner_debug() -> bool {
    std::env::var("RUNNER_DEBUG").map(|v| v == "1").unwrap_or(false)
}
