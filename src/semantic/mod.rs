//! semantic-release wrapper
//!
//! Installs `semantic-release` (plus any extra plugins) with npm into the
//! action's install directory, runs it through a small Node driver, and relays
//! the computed release as step outputs.

pub mod runner;

pub use runner::{CommandOutput, CommandRunner, CommandSpec, SystemRunner};

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::actions::OutputSink;
use crate::error::{ReleaseActionError, Result};
use crate::version::version_components;

const SEMANTIC_RELEASE_PACKAGE: &str = "semantic-release";

const DRIVER_SCRIPT: &str = include_str!("driver.mjs");

/// Prefix of the single stdout line carrying the driver's JSON result.
pub const RESULT_PREFIX: &str = "::semantic-release-result::";

/// Prefix of the stdout line carrying the JSON-encoded message of a failed run.
pub const ERROR_PREFIX: &str = "::semantic-release-error::";

/// Environment variable the driver reads its options from.
pub const OPTIONS_ENV: &str = "SEMANTIC_ACTION_OPTIONS";

/// Names of the step outputs; keep in sync with the action metadata.
pub mod outputs {
    pub const LAST_RELEASE_VERSION: &str = "last-release-version";
    pub const LAST_RELEASE_MAJOR_VERSION: &str = "last-release-major-version";
    pub const NEW_RELEASE_PUBLISHED: &str = "new-release-published";
    pub const NEW_RELEASE_TYPE: &str = "new-release-type";
    pub const NEW_RELEASE_NOTES: &str = "new-release-notes";
    pub const NEW_RELEASE_VERSION: &str = "new-release-version";
    pub const NEW_RELEASE_MAJOR_VERSION: &str = "new-release-major-version";
    pub const NEW_RELEASE_MINOR_VERSION: &str = "new-release-minor-version";
    pub const NEW_RELEASE_PATCH_VERSION: &str = "new-release-patch-version";
}

/// Inputs of the semantic-release step.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticInputs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branches: Option<String>,
    pub ci: bool,
    pub dry_run: bool,
    pub extra_plugins: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_version: Option<String>,
}

/// Splits the free-form extra plugins input into package specs.
///
/// Quotes are dropped and newlines act as separators, so both
/// `"a@1 'b'"` and a YAML block list work.
pub fn parse_extra_plugins(raw: &str) -> Vec<String> {
    let unquoted = QUOTES.replace_all(raw, "");
    let single_line = LINE_BREAKS.replace_all(&unquoted, " ");

    single_line
        .trim()
        .split(' ')
        .filter(|package| !package.is_empty())
        .map(str::to_string)
        .collect()
}

static QUOTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"["']"#).expect("quote pattern is valid"));

static LINE_BREAKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\n\r]").expect("line break pattern is valid"));

/// The semantic-release package spec, pinned when a version is given.
pub fn semantic_release_package(semantic_version: Option<&str>) -> String {
    match semantic_version {
        Some(version) => format!("{}@{}", SEMANTIC_RELEASE_PACKAGE, version),
        None => SEMANTIC_RELEASE_PACKAGE.to_string(),
    }
}

/// Arguments for `npm install`; `--silent` unless the runner is in debug mode.
pub fn npm_install_args(packages: &[String], debug: bool) -> Vec<String> {
    let mut args = vec!["install".to_string()];
    args.extend(packages.iter().cloned());
    args.push("--no-audit".to_string());
    if !debug {
        args.push("--silent".to_string());
    }
    args
}

/// Runs `npm install` in `install_dir`.
pub fn run_npm_install(
    runner: &dyn CommandRunner,
    install_dir: &Path,
    packages: &[String],
    debug: bool,
) -> Result<()> {
    tracing::info!("Installing packages in {}", install_dir.display());
    let spec = CommandSpec::new("npm", install_dir).args(npm_install_args(packages, debug));
    let output = runner.run(&spec)?;

    if !output.stderr.is_empty() {
        tracing::error!("{}", output.stderr);
    }
    if !output.stdout.is_empty() {
        tracing::info!("{}", output.stdout);
    }
    if !output.success() {
        return Err(ReleaseActionError::Npm(output.status()));
    }
    Ok(())
}

/// Options object handed to semantic-release.
///
/// `branches` is passed through as JSON when it parses as JSON, so both
/// `main` and `["main", {"name": "beta", "prerelease": true}]` work.
pub fn release_options(inputs: &SemanticInputs) -> Value {
    let mut options = Map::new();
    if let Some(branches) = &inputs.branches {
        let value = serde_json::from_str::<Value>(branches)
            .unwrap_or_else(|_| Value::String(branches.clone()));
        options.insert("branches".to_string(), value);
    }
    options.insert("ci".to_string(), Value::Bool(inputs.ci));
    options.insert("dryRun".to_string(), Value::Bool(inputs.dry_run));
    Value::Object(options)
}

/// A release as reported by semantic-release.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(rename = "type", default)]
    pub release_type: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(rename = "gitTag", default)]
    pub git_tag: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseSummary {
    #[serde(default)]
    pub last_release: Option<Release>,
    #[serde(default)]
    pub next_release: Option<Release>,
}

/// Extracts the driver result from semantic-release's stdout.
///
/// `Ok(None)` means semantic-release ran but found nothing to release.
pub fn parse_driver_output(stdout: &str) -> Result<Option<ReleaseSummary>> {
    let line = stdout
        .lines()
        .rev()
        .find_map(|line| line.trim().strip_prefix(RESULT_PREFIX))
        .ok_or_else(|| ReleaseActionError::semantic_release("driver produced no result"))?;

    Ok(serde_json::from_str(line)?)
}

/// The error message the driver reported for a failed run, if any.
pub fn parse_driver_error(stdout: &str) -> Option<String> {
    stdout
        .lines()
        .rev()
        .find_map(|line| line.trim().strip_prefix(ERROR_PREFIX))
        .map(|encoded| {
            serde_json::from_str::<String>(encoded).unwrap_or_else(|_| encoded.to_string())
        })
}

/// Runs semantic-release through the Node driver in `install_dir`.
pub fn run_driver(
    runner: &dyn CommandRunner,
    install_dir: &Path,
    inputs: &SemanticInputs,
) -> Result<Option<ReleaseSummary>> {
    let options = release_options(inputs);
    let spec = CommandSpec::new("node", install_dir)
        .args(["--input-type=module", "-"])
        .env(OPTIONS_ENV, options.to_string())
        .stdin(DRIVER_SCRIPT);

    let output = runner.run(&spec)?;
    for line in output.stdout.lines() {
        if !line.starts_with(RESULT_PREFIX)
            && !line.starts_with(ERROR_PREFIX)
            && !line.trim().is_empty()
        {
            tracing::info!("{}", line);
        }
    }
    let stderr = output.stderr.trim();
    if !stderr.is_empty() {
        tracing::error!("{}", stderr);
    }

    if !output.success() {
        let reason = parse_driver_error(&output.stdout).unwrap_or_else(|| {
            if stderr.is_empty() {
                "no error output".to_string()
            } else {
                stderr.to_string()
            }
        });
        return Err(ReleaseActionError::semantic_release(format!(
            "{}: {}",
            output.status(),
            reason
        )));
    }

    parse_driver_output(&output.stdout)
}

/// Sets the step outputs for a semantic-release result.
pub fn relay_outputs(
    summary: &ReleaseSummary,
    dry_run: bool,
    sink: &mut dyn OutputSink,
) -> Result<()> {
    let last = match summary
        .last_release
        .as_ref()
        .and_then(|r| r.version.as_deref())
        .filter(|v| !v.is_empty())
    {
        Some(version) => Some((version, version_components(version)?.0)),
        None => None,
    };

    // Nothing is written until both releases have parsed.
    let next = match &summary.next_release {
        Some(next) => {
            let version = next.version.as_deref().ok_or_else(|| {
                ReleaseActionError::semantic_release("next release has no version")
            })?;
            Some((next, version, version_components(version)?))
        }
        None => None,
    };

    if let Some((version, major)) = last {
        sink.set_output(outputs::LAST_RELEASE_VERSION, version)?;
        sink.set_output(outputs::LAST_RELEASE_MAJOR_VERSION, &major.to_string())?;
    }

    let Some((next, version, (major, minor, patch))) = next else {
        return Ok(());
    };

    sink.set_output(outputs::NEW_RELEASE_PUBLISHED, "true")?;
    sink.set_output(
        outputs::NEW_RELEASE_TYPE,
        next.release_type.as_deref().unwrap_or_default(),
    )?;
    sink.set_output(
        outputs::NEW_RELEASE_NOTES,
        next.notes.as_deref().unwrap_or_default(),
    )?;
    sink.set_output(outputs::NEW_RELEASE_VERSION, version)?;
    sink.set_output(outputs::NEW_RELEASE_MAJOR_VERSION, &major.to_string())?;
    sink.set_output(outputs::NEW_RELEASE_MINOR_VERSION, &minor.to_string())?;
    sink.set_output(outputs::NEW_RELEASE_PATCH_VERSION, &patch.to_string())?;

    tracing::info!(
        "New release{} published: {}",
        if dry_run { " to be" } else { "" },
        version
    );
    Ok(())
}

/// Installs semantic-release and relays its result.
pub fn run_semantic_release(
    runner: &dyn CommandRunner,
    inputs: &SemanticInputs,
    install_dir: &Path,
    debug: bool,
    sink: &mut dyn OutputSink,
) -> Result<Option<ReleaseSummary>> {
    tracing::info!(
        "Running semantic-release action with inputs: {}",
        serde_json::to_string(inputs)?
    );

    let mut packages = vec![semantic_release_package(
        inputs.semantic_version.as_deref(),
    )];
    packages.extend(inputs.extra_plugins.iter().cloned());
    run_npm_install(runner, install_dir, &packages, debug)?;

    let summary = run_driver(runner, install_dir, inputs)?;
    if let Some(summary) = &summary {
        relay_outputs(summary, inputs.dry_run, sink)?;
    }
    Ok(summary)
}
