use std::path::Path;

use crate::breaking::ReleaseContext;
use crate::error::Result;
use crate::failure::FailureSignal;
use crate::github::GitHubApi;

/// Wraps template content in a "missing doc" header and a fenced code block.
///
/// `doc_hint` is the workspace-relative path where the real doc should live.
pub fn format_template_comment(template: &str, doc_hint: &str) -> String {
    format!(
        "## Missing breaking change document \n Use the below template and create the document at: {}\n ```\n{}\n```",
        doc_hint, template
    )
}

/// Reads `content_path` and posts it as a new pull request comment.
///
/// With `is_code_block` the content is treated as a template and wrapped by
/// [format_template_comment].
///
/// # Returns
/// * `Ok(None)` - Comment posted
/// * `Ok(Some(signal))` - The POST failed; recorded, not raised
/// * `Err` - The content could not be read
pub fn publish_comment(
    api: &dyn GitHubApi,
    ctx: &ReleaseContext,
    content_path: &Path,
    doc_hint: &str,
    is_code_block: bool,
) -> Result<Option<FailureSignal>> {
    let mut content = super::doc::read_content(content_path)?;

    if is_code_block {
        content = format_template_comment(&content, doc_hint);
    }

    match api.create_comment(&ctx.repository, &ctx.pull_request_id, &content) {
        Ok(()) => {
            tracing::debug!("Comment published successfully.");
            Ok(None)
        }
        Err(e) => {
            let failure = FailureSignal::PublishComment {
                reason: e.to_string(),
            };
            tracing::error!("{}", failure);
            Ok(Some(failure))
        }
    }
}
