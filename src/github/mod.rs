//! GitHub REST API abstraction layer
//!
//! The breaking change flow only needs three issue-comment endpoints, so the
//! [GitHubApi] trait is deliberately narrow. Implementations:
//!
//! - [client::HttpGitHub]: blocking client backed by `ureq`
//! - [mock::MockGitHub]: records every call for tests
//!
//! Stages depend on the trait, never on a concrete client.

pub mod client;
pub mod mock;

pub use client::HttpGitHub;
pub use mock::{MockGitHub, RecordedCall};

use serde::Deserialize;

use crate::error::Result;

/// A pull request comment, as far as this crate cares about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: u64,
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct CommentPayload {
    id: u64,
    #[serde(default)]
    body: Option<String>,
}

impl From<CommentPayload> for Comment {
    fn from(payload: CommentPayload) -> Self {
        Comment {
            id: payload.id,
            body: payload.body.unwrap_or_default(),
        }
    }
}

/// The list endpoint is consumed in both the `{ "comments": [...] }` shape and
/// GitHub's native bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CommentsPayload {
    Wrapped { comments: Vec<CommentPayload> },
    Bare(Vec<CommentPayload>),
}

impl CommentsPayload {
    fn into_comments(self) -> Vec<Comment> {
        let payloads = match self {
            CommentsPayload::Wrapped { comments } => comments,
            CommentsPayload::Bare(comments) => comments,
        };
        payloads.into_iter().map(Comment::from).collect()
    }
}

/// Parses a comment list response body.
pub fn parse_comments(json: &str) -> Result<Vec<Comment>> {
    let payload: CommentsPayload = serde_json::from_str(json)?;
    Ok(payload.into_comments())
}

/// Issue comment operations against one GitHub API host.
///
/// Every method is a single blocking request. A non-2xx response is an
/// [crate::error::ReleaseActionError::Api] error; transport failures are
/// [crate::error::ReleaseActionError::Http].
pub trait GitHubApi {
    /// `GET /repos/{repo}/issues/{pull_request}/comments`
    fn list_comments(&self, repo: &str, pull_request: &str) -> Result<Vec<Comment>>;

    /// `DELETE /repos/{repo}/issues/comments/{comment_id}`
    fn delete_comment(&self, repo: &str, comment_id: u64) -> Result<()>;

    /// `POST /repos/{repo}/issues/{pull_request}/comments` with `{ "body": body }`
    fn create_comment(&self, repo: &str, pull_request: &str, body: &str) -> Result<()>;
}

/// Path of the comment list (and create) endpoint for a pull request.
pub fn comments_path(repo: &str, pull_request: &str) -> String {
    format!("/repos/{}/issues/{}/comments", repo, pull_request)
}

/// Path addressing a single issue comment.
pub fn comment_path(repo: &str, comment_id: u64) -> String {
    format!("/repos/{}/issues/comments/{}", repo, comment_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wrapped_comments() {
        let comments =
            parse_comments(r#"{"comments":[{"id":1,"body":"a"},{"id":2,"body":"b"}]}"#).unwrap();
        assert_eq!(
            comments,
            vec![
                Comment { id: 1, body: "a".to_string() },
                Comment { id: 2, body: "b".to_string() },
            ]
        );
    }

    #[test]
    fn test_parse_bare_array_with_extra_fields() {
        let comments = parse_comments(
            r#"[{"id":9,"body":"Upgrade from v1","user":{"login":"bot"},"html_url":"x"}]"#,
        )
        .unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].id, 9);
    }

    #[test]
    fn test_parse_null_body_is_empty() {
        let comments = parse_comments(r#"[{"id":3,"body":null}]"#).unwrap();
        assert_eq!(comments[0].body, "");
    }

    #[test]
    fn test_parse_rejects_unrelated_json() {
        assert!(parse_comments(r#"{"message":"Not Found"}"#).is_err());
    }

    #[test]
    fn test_paths() {
        assert_eq!(comments_path("o/r", "12"), "/repos/o/r/issues/12/comments");
        assert_eq!(comment_path("o/r", 99), "/repos/o/r/issues/comments/99");
    }
}
