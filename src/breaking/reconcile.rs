use crate::breaking::ReleaseContext;
use crate::failure::FailureSignal;
use crate::github::GitHubApi;

/// What happened while cleaning up stale comments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    /// Ids of comments that were deleted, in list order
    pub deleted: Vec<u64>,
    pub failures: Vec<FailureSignal>,
}

/// Deletes every comment on the pull request whose body contains `marker`.
///
/// Deletions are issued one at a time in the order the API listed the comments.
/// A failed listing ends reconciliation; a failed deletion is recorded and the
/// remaining comments are still processed. Nothing here returns an error.
pub fn delete_matching_comments(
    api: &dyn GitHubApi,
    ctx: &ReleaseContext,
    marker: &str,
) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    let comments = match api.list_comments(&ctx.repository, &ctx.pull_request_id) {
        Ok(comments) => comments,
        Err(e) => {
            let failure = FailureSignal::FetchComments {
                reason: e.to_string(),
            };
            tracing::error!("{}", failure);
            report.failures.push(failure);
            return report;
        }
    };

    if comments.is_empty() {
        tracing::info!("No comments found");
        return report;
    }

    for comment in comments.iter().filter(|c| c.body.contains(marker)) {
        match api.delete_comment(&ctx.repository, comment.id) {
            Ok(()) => {
                tracing::debug!("Comment {} deleted successfully.", comment.id);
                report.deleted.push(comment.id);
            }
            Err(e) => {
                let failure = FailureSignal::DeleteComment {
                    id: comment.id,
                    reason: e.to_string(),
                };
                tracing::error!("{}", failure);
                report.failures.push(failure);
            }
        }
    }

    report
}
