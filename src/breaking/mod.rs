//! Breaking change doc validation
//!
//! Runs the gate for a major release on a pull request:
//! 1. Compare the previous and next major versions
//! 2. Delete earlier comments posted by this action
//! 3. Check for `v{next}.md` under the docs directory
//! 4. Post the doc, or the template as a code block when the doc is missing
//!
//! A missing doc still gets the template posted before the run is marked failed.

pub mod doc;
pub mod publish;
pub mod reconcile;

pub use doc::{doc_exists, read_content};
pub use publish::{format_template_comment, publish_comment};
pub use reconcile::{delete_matching_comments, ReconcileReport};

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::failure::FailureSignal;
use crate::github::GitHubApi;
use crate::version::is_breaking_change;

/// Inputs for one validation run. Never mutated after construction.
#[derive(Clone, PartialEq)]
pub struct ReleaseContext {
    pub previous_version: u64,
    pub next_version: u64,
    /// `owner/name`
    pub repository: String,
    pub pull_request_id: String,
    pub auth_token: String,
}

impl ReleaseContext {
    pub fn new(
        previous_version: u64,
        next_version: u64,
        repository: impl Into<String>,
        pull_request_id: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Self {
        ReleaseContext {
            previous_version,
            next_version,
            repository: repository.into(),
            pull_request_id: pull_request_id.into(),
            auth_token: auth_token.into(),
        }
    }
}

impl fmt::Debug for ReleaseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseContext")
            .field("previous_version", &self.previous_version)
            .field("next_version", &self.next_version)
            .field("repository", &self.repository)
            .field("pull_request_id", &self.pull_request_id)
            .field("auth_token", &"***")
            .finish()
    }
}

/// Where docs and the fallback template live on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct DocLayout {
    pub workspace: PathBuf,
    /// Relative to `workspace`
    pub docs_dir: PathBuf,
    pub template: PathBuf,
}

impl DocLayout {
    pub fn new(
        workspace: impl Into<PathBuf>,
        docs_dir: impl Into<PathBuf>,
        template: impl Into<PathBuf>,
    ) -> Self {
        DocLayout {
            workspace: workspace.into(),
            docs_dir: docs_dir.into(),
            template: template.into(),
        }
    }

    fn doc_file_name(next_version: u64) -> String {
        format!("v{}.md", next_version)
    }

    /// Absolute location of the doc for `next_version`.
    pub fn doc_path(&self, next_version: u64) -> PathBuf {
        self.workspace
            .join(&self.docs_dir)
            .join(Self::doc_file_name(next_version))
    }

    /// Workspace-relative location shown to the PR author, e.g. `./docs/breaking-changes/v2.md`.
    pub fn doc_hint(&self, next_version: u64) -> String {
        let relative = Path::new(".")
            .join(&self.docs_dir)
            .join(Self::doc_file_name(next_version));
        relative.to_string_lossy().replace('\\', "/")
    }
}

/// Terminal state of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Not a major bump; nothing was done
    NotBreaking,
    /// The doc exists and was posted
    DocPresent,
    /// The template was posted in place of the missing doc
    DocMissing,
}

/// Result of a validation run that got as far as a terminal state.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub outcome: Outcome,
    pub deleted_comments: Vec<u64>,
    /// Recorded failures in the order they happened
    pub failures: Vec<FailureSignal>,
}

impl ValidationReport {
    /// The host step must fail when the doc is missing or any API call failed.
    pub fn is_failed(&self) -> bool {
        self.outcome == Outcome::DocMissing || !self.failures.is_empty()
    }
}

/// Runs the whole breaking change flow.
///
/// # Returns
/// * `Ok(report)` - A terminal state was reached; check [ValidationReport::is_failed]
/// * `Err` - The doc or template could not be read
pub fn validate_breaking_doc(
    api: &dyn GitHubApi,
    ctx: &ReleaseContext,
    layout: &DocLayout,
    marker: &str,
) -> Result<ValidationReport> {
    if !is_breaking_change(ctx.previous_version, ctx.next_version) {
        tracing::info!("It is not a breaking change");
        return Ok(ValidationReport {
            outcome: Outcome::NotBreaking,
            deleted_comments: Vec::new(),
            failures: Vec::new(),
        });
    }

    tracing::debug!("Deleting previous breaking change template/doc comment on the PR");
    let reconciled = delete_matching_comments(api, ctx, marker);
    let mut failures = reconciled.failures;

    let doc_path = layout.doc_path(ctx.next_version);
    let doc_present = doc_exists(&doc_path);
    let (content_path, is_code_block) = if doc_present {
        (doc_path.as_path(), false)
    } else {
        (layout.template.as_path(), true)
    };

    tracing::debug!(
        "Publishing {} comment on the PR",
        if is_code_block { "template" } else { "doc" }
    );
    let hint = layout.doc_hint(ctx.next_version);
    if let Some(failure) = publish_comment(api, ctx, content_path, &hint, is_code_block)? {
        failures.push(failure);
    }

    let outcome = if doc_present {
        Outcome::DocPresent
    } else {
        failures.push(FailureSignal::DocMissing { path: doc_path });
        Outcome::DocMissing
    };

    Ok(ValidationReport {
        outcome,
        deleted_comments: reconciled.deleted,
        failures,
    })
}
