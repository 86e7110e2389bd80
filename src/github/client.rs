use serde::Serialize;
use ureq::http::StatusCode;
use ureq::{Agent, RequestBuilder};

use crate::error::{ReleaseActionError, Result};
use crate::github::{comment_path, comments_path, parse_comments, Comment, GitHubApi};

#[derive(Debug, Serialize)]
struct CreateCommentRequest<'a> {
    body: &'a str,
}

/// Blocking GitHub REST client.
///
/// Status codes are checked by hand so that a 4xx/5xx becomes an
/// [ReleaseActionError::Api] naming the request instead of a bare transport error.
pub struct HttpGitHub {
    agent: Agent,
    api_url: String,
    token: String,
}

impl HttpGitHub {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>) -> Self {
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();

        HttpGitHub {
            agent,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn authorize<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        request
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json")
            .header("Accept", "application/vnd.github+json")
    }
}

fn ensure_success(method: &'static str, url: &str, status: StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ReleaseActionError::api(method, url, status.as_u16()))
    }
}

impl GitHubApi for HttpGitHub {
    fn list_comments(&self, repo: &str, pull_request: &str) -> Result<Vec<Comment>> {
        let url = self.url(&comments_path(repo, pull_request));
        tracing::debug!("GET {}", url);

        let mut response = self.authorize(self.agent.get(url.as_str())).call()?;
        ensure_success("GET", &url, response.status())?;

        let text = response.body_mut().read_to_string()?;
        parse_comments(&text)
    }

    fn delete_comment(&self, repo: &str, comment_id: u64) -> Result<()> {
        let url = self.url(&comment_path(repo, comment_id));
        tracing::debug!("DELETE {}", url);

        let response = self.authorize(self.agent.delete(url.as_str())).call()?;
        ensure_success("DELETE", &url, response.status())
    }

    fn create_comment(&self, repo: &str, pull_request: &str, body: &str) -> Result<()> {
        let url = self.url(&comments_path(repo, pull_request));
        tracing::debug!("POST {}", url);

        let response = self
            .authorize(self.agent.post(url.as_str()))
            .send_json(&CreateCommentRequest { body })?;
        ensure_success("POST", &url, response.status())
    }
}
