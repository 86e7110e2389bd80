use std::fmt;
use std::path::PathBuf;

/// Failures recorded while validating a breaking change.
/// These never abort the run; they are reported to the host and mark the step failed.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureSignal {
    /// Listing the pull request comments failed
    FetchComments { reason: String },
    /// Deleting a single stale comment failed
    DeleteComment { id: u64, reason: String },
    /// Posting the doc or template comment failed
    PublishComment { reason: String },
    /// The breaking change doc does not exist at the expected path
    DocMissing { path: PathBuf },
}

impl fmt::Display for FailureSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureSignal::FetchComments { reason } => {
                write!(f, "Failed to fetch comments: {}", reason)
            }
            FailureSignal::DeleteComment { id, reason } => {
                write!(f, "Failed to delete comment {}: {}", id, reason)
            }
            FailureSignal::PublishComment { reason } => {
                write!(f, "Failed to publish comment: {}", reason)
            }
            FailureSignal::DocMissing { path } => {
                write!(f, "Breaking change doc does not exist: {}", path.display())
            }
        }
    }
}
