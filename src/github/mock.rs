use std::cell::RefCell;
use std::collections::HashSet;

use crate::error::{ReleaseActionError, Result};
use crate::github::{comment_path, comments_path, Comment, GitHubApi};

/// One request observed by [MockGitHub], in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    List { path: String },
    Delete { path: String, id: u64 },
    Create { path: String, body: String },
}

impl RecordedCall {
    pub fn method(&self) -> &'static str {
        match self {
            RecordedCall::List { .. } => "GET",
            RecordedCall::Delete { .. } => "DELETE",
            RecordedCall::Create { .. } => "POST",
        }
    }

    pub fn path(&self) -> &str {
        match self {
            RecordedCall::List { path }
            | RecordedCall::Delete { path, .. }
            | RecordedCall::Create { path, .. } => path.as_str(),
        }
    }
}

/// Mock GitHub API for testing without network access
///
/// Serves a fixed comment list and can be told to fail individual endpoints.
pub struct MockGitHub {
    comments: Vec<Comment>,
    fail_list: bool,
    fail_create: bool,
    fail_delete: HashSet<u64>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl MockGitHub {
    /// Create a mock with no comments on the pull request
    pub fn new() -> Self {
        MockGitHub {
            comments: Vec::new(),
            fail_list: false,
            fail_create: false,
            fail_delete: HashSet::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Add a comment served by the list endpoint
    pub fn with_comment(mut self, id: u64, body: impl Into<String>) -> Self {
        self.comments.push(Comment {
            id,
            body: body.into(),
        });
        self
    }

    /// Make the list endpoint answer 500
    pub fn failing_list(mut self) -> Self {
        self.fail_list = true;
        self
    }

    /// Make the create endpoint answer 500
    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    /// Make deleting the given comment answer 404
    pub fn failing_delete(mut self, id: u64) -> Self {
        self.fail_delete.insert(id);
        self
    }

    /// All requests made so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// Bodies of every comment created so far
    pub fn created_bodies(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                RecordedCall::Create { body, .. } => Some(body.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl Default for MockGitHub {
    fn default() -> Self {
        Self::new()
    }
}

impl GitHubApi for MockGitHub {
    fn list_comments(&self, repo: &str, pull_request: &str) -> Result<Vec<Comment>> {
        let path = comments_path(repo, pull_request);
        self.record(RecordedCall::List { path: path.clone() });
        if self.fail_list {
            return Err(ReleaseActionError::api("GET", path, 500));
        }
        Ok(self.comments.clone())
    }

    fn delete_comment(&self, repo: &str, comment_id: u64) -> Result<()> {
        let path = comment_path(repo, comment_id);
        self.record(RecordedCall::Delete {
            path: path.clone(),
            id: comment_id,
        });
        if self.fail_delete.contains(&comment_id) {
            return Err(ReleaseActionError::api("DELETE", path, 404));
        }
        Ok(())
    }

    fn create_comment(&self, repo: &str, pull_request: &str, body: &str) -> Result<()> {
        let path = comments_path(repo, pull_request);
        self.record(RecordedCall::Create {
            path: path.clone(),
            body: body.to_string(),
        });
        if self.fail_create {
            return Err(ReleaseActionError::api("POST", path, 500));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_calls_in_order() {
        let mock = MockGitHub::new().with_comment(1, "hello");

        let comments = mock.list_comments("o/r", "5").unwrap();
        assert_eq!(comments.len(), 1);
        mock.delete_comment("o/r", 1).unwrap();
        mock.create_comment("o/r", "5", "body").unwrap();

        let methods: Vec<_> = mock.calls().iter().map(|c| c.method()).collect();
        assert_eq!(methods, vec!["GET", "DELETE", "POST"]);
        assert_eq!(mock.calls()[1].path(), "/repos/o/r/issues/comments/1");
        assert_eq!(mock.created_bodies(), vec!["body".to_string()]);
    }

    #[test]
    fn test_mock_failures() {
        let mock = MockGitHub::new()
            .failing_list()
            .failing_create()
            .failing_delete(4);

        assert!(mock.list_comments("o/r", "1").is_err());
        assert!(mock.delete_comment("o/r", 4).is_err());
        assert!(mock.delete_comment("o/r", 5).is_ok());
        assert!(mock.create_comment("o/r", "1", "x").is_err());
        assert_eq!(mock.calls().len(), 4);
    }

    #[test]
    fn test_mock_default_is_empty() {
        let mock = MockGitHub::default();
        assert!(mock.list_comments("o/r", "1").unwrap().is_empty());
    }
}
