//! Turns parsed arguments into explicit inputs and runs the steps.
//!
//! This is the only place that touches configuration sources; everything
//! below it receives plain values.

use std::path::Path;

use crate::actions::{report_failure, OutputSink};
use crate::breaking::{validate_breaking_doc, DocLayout, Outcome, ReleaseContext, ValidationReport};
use crate::cli::{SemanticReleaseArgs, ValidateBreakingDocArgs};
use crate::config::{load_config, Config};
use crate::error::Result;
use crate::github::{GitHubApi, HttpGitHub};
use crate::semantic::{parse_extra_plugins, run_semantic_release, CommandRunner, SemanticInputs};
use crate::version::parse_major_version;

/// Fully resolved inputs of the breaking change step.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakingDocPlan {
    pub context: ReleaseContext,
    pub layout: DocLayout,
    pub marker: String,
    pub api_url: String,
}

/// Resolves arguments against the configuration file.
pub fn plan_breaking_doc(args: &ValidateBreakingDocArgs, config: &Config) -> Result<BreakingDocPlan> {
    let previous = parse_major_version(&args.last_release_version)?;
    let next = parse_major_version(&args.new_release_version)?;

    let context = ReleaseContext::new(
        previous,
        next,
        args.repo.trim(),
        args.pull_request_id.trim(),
        args.github_token.clone(),
    );

    let settings = &config.breaking_changes;
    let layout = DocLayout::new(
        args.workspace.clone(),
        settings.docs_dir.clone(),
        settings.template_path(&args.action_path),
    );

    let api_url = args
        .api_url
        .clone()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| config.github.api_url.clone());

    Ok(BreakingDocPlan {
        context,
        layout,
        marker: settings.marker.clone(),
        api_url,
    })
}

/// Reports a validation result to the host; returns whether the step succeeded.
pub fn report_validation(report: &ValidationReport) -> bool {
    match report.outcome {
        Outcome::NotBreaking => {}
        Outcome::DocPresent => tracing::info!("Breaking change doc found and published"),
        Outcome::DocMissing => tracing::warn!("Breaking change doc missing, template published"),
    }

    for failure in &report.failures {
        report_failure(&failure.to_string());
    }

    !report.is_failed()
}

/// Runs the breaking change step with the given API client.
pub fn execute_breaking_doc(api: &dyn GitHubApi, plan: &BreakingDocPlan) -> Result<bool> {
    tracing::debug!("Validating breaking change doc for {:?}", plan.context);
    let report = validate_breaking_doc(api, &plan.context, &plan.layout, &plan.marker)?;
    Ok(report_validation(&report))
}

/// Entry point for `validate-breaking-doc`.
pub fn run_validate_breaking_doc(args: &ValidateBreakingDocArgs) -> Result<bool> {
    let config = load_config(args.config.as_deref(), &args.workspace)?;
    let plan = plan_breaking_doc(args, &config)?;
    let api = HttpGitHub::new(plan.api_url.clone(), plan.context.auth_token.clone());
    execute_breaking_doc(&api, &plan)
}

/// Normalises the semantic-release arguments; blank strings count as unset.
pub fn semantic_inputs(args: &SemanticReleaseArgs) -> SemanticInputs {
    let non_blank = |value: &Option<String>| {
        value
            .as_ref()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    SemanticInputs {
        branches: non_blank(&args.branches),
        ci: args.ci,
        dry_run: args.dry_run,
        extra_plugins: parse_extra_plugins(&args.extra_plugins),
        semantic_version: non_blank(&args.semantic_version),
    }
}

/// Entry point for `semantic-release`.
pub fn run_semantic_release_step(
    args: &SemanticReleaseArgs,
    runner: &dyn CommandRunner,
    sink: &mut dyn OutputSink,
    debug: bool,
) -> Result<()> {
    let inputs = semantic_inputs(args);
    let install_dir: &Path = &args.install_dir;
    run_semantic_release(runner, &inputs, install_dir, debug, sink)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::FailureSignal;
    use std::path::PathBuf;

    fn args() -> ValidateBreakingDocArgs {
        ValidateBreakingDocArgs {
            last_release_version: "1.4.2".to_string(),
            new_release_version: "2.0.0".to_string(),
            repo: "owner/name".to_string(),
            pull_request_id: "42".to_string(),
            github_token: "token".to_string(),
            workspace: PathBuf::from("/work"),
            action_path: PathBuf::from("/action/validate"),
            api_url: None,
            config: None,
        }
    }

    #[test]
    fn test_plan_uses_major_versions_and_defaults() {
        let plan = plan_breaking_doc(&args(), &Config::default()).unwrap();
        assert_eq!(plan.context.previous_version, 1);
        assert_eq!(plan.context.next_version, 2);
        assert_eq!(plan.marker, "Upgrade from v");
        assert_eq!(plan.api_url, "https://api.github.com");
        assert_eq!(
            plan.layout.doc_path(2),
            PathBuf::from("/work/docs/breaking-changes/v2.md")
        );
        assert_eq!(
            plan.layout.template,
            PathBuf::from("/action/validate/../templates/breaking-changes.md")
        );
    }

    #[test]
    fn test_plan_api_url_flag_wins() {
        let mut a = args();
        a.api_url = Some("https://ghe.local/api/v3".to_string());
        let plan = plan_breaking_doc(&a, &Config::default()).unwrap();
        assert_eq!(plan.api_url, "https://ghe.local/api/v3");
    }

    #[test]
    fn test_plan_rejects_bad_version() {
        let mut a = args();
        a.new_release_version = "two".to_string();
        assert!(plan_breaking_doc(&a, &Config::default()).is_err());
    }

    #[test]
    fn test_report_validation() {
        let ok = ValidationReport {
            outcome: Outcome::NotBreaking,
            deleted_comments: vec![],
            failures: vec![],
        };
        assert!(report_validation(&ok));

        let missing = ValidationReport {
            outcome: Outcome::DocMissing,
            deleted_comments: vec![],
            failures: vec![FailureSignal::DocMissing {
                path: PathBuf::from("/work/docs/breaking-changes/v2.md"),
            }],
        };
        assert!(!report_validation(&missing));
    }

    #[test]
    fn test_semantic_inputs_blank_is_unset() {
        let args = SemanticReleaseArgs {
            branches: Some("  ".to_string()),
            ci: true,
            dry_run: false,
            extra_plugins: "a\n'b'".to_string(),
            semantic_version: Some(String::new()),
            install_dir: PathBuf::from("."),
        };
        let inputs = semantic_inputs(&args);
        assert_eq!(inputs.branches, None);
        assert_eq!(inputs.semantic_version, None);
        assert_eq!(inputs.extra_plugins, vec!["a", "b"]);
        assert!(inputs.ci);
    }
}
