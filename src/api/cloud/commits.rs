//
//  bitbucket-client
//  api/cloud/commits.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Commit endpoints: history, comments, build statuses and approvals.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::{json_body, non_empty, with_query};
use crate::api::common::{check_envelope, ApiError};
use crate::Client;

/// Options for commit operations.
#[derive(Debug, Clone, Default)]
pub struct CommitsOptions {
    pub owner: String,
    pub repo_slug: String,
    /// Commit hash, or branch name for [`CommitsApi::list`].
    pub revision: String,
    /// Comment identifier, for [`CommitsApi::comment`].
    pub comment_id: String,
    /// Only commits reachable from this ref.
    pub include: Option<String>,
    /// Drop commits reachable from this ref.
    pub exclude: Option<String>,
}

impl CommitsOptions {
    pub fn new(owner: impl Into<String>, repo_slug: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo_slug: repo_slug.into(),
            ..Default::default()
        }
    }

    pub fn revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = revision.into();
        self
    }
}

/// A build status reported against a commit.
///
/// `state` is one of `SUCCESSFUL`, `FAILED`, `INPROGRESS` or `STOPPED`.
#[derive(Debug, Clone, Default)]
pub struct CommitStatusOptions {
    pub key: String,
    pub state: String,
    pub url: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Serialize)]
struct CommitStatusBody<'a> {
    key: &'a str,
    state: &'a str,
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

pub fn build_commit_status_body(status: &CommitStatusOptions) -> Result<String, ApiError> {
    json_body(&CommitStatusBody {
        key: &status.key,
        state: &status.state,
        url: &status.url,
        name: non_empty(&status.name),
        description: non_empty(&status.description),
    })
}

/// Commit endpoints.
#[derive(Debug, Clone, Copy)]
pub struct CommitsApi<'a> {
    client: &'a Client,
}

impl<'a> CommitsApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn url(&self, opts: &CommitsOptions, template: &str, extra: &str) -> String {
        self.client.request_url(
            template,
            &[&opts.owner, &opts.repo_slug, &opts.revision, extra],
        )
    }

    async fn call(&self, method: Method, url: &str, body: Option<String>) -> Result<Value, ApiError> {
        check_envelope(self.client.execute(method, url, body).await?)
    }

    /// Commit history of `opts.revision` (a branch, or the whole repository when empty).
    pub async fn list(&self, opts: &CommitsOptions) -> Result<Value, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/commits/%s", "");
        let mut query = Vec::new();
        if let Some(include) = non_empty(&opts.include) {
            query.push(("include", include));
        }
        if let Some(exclude) = non_empty(&opts.exclude) {
            query.push(("exclude", exclude));
        }
        self.call(Method::GET, &with_query(url, &query), None).await
    }

    pub async fn get(&self, opts: &CommitsOptions) -> Result<Value, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/commit/%s", "");
        self.call(Method::GET, &url, None).await
    }

    pub async fn comments(&self, opts: &CommitsOptions) -> Result<Value, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/commit/%s/comments", "");
        self.call(Method::GET, &url, None).await
    }

    pub async fn comment(&self, opts: &CommitsOptions) -> Result<Value, ApiError> {
        let url = self.url(
            opts,
            "/repositories/%s/%s/commit/%s/comments/%s",
            &opts.comment_id,
        );
        self.call(Method::GET, &url, None).await
    }

    /// All build statuses of a commit.
    pub async fn statuses(&self, opts: &CommitsOptions) -> Result<Value, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/commit/%s/statuses", "");
        self.call(Method::GET, &url, None).await
    }

    /// The build status registered under `key`.
    pub async fn status(&self, opts: &CommitsOptions, key: &str) -> Result<Value, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/commit/%s/statuses/build/%s", key);
        self.call(Method::GET, &url, None).await
    }

    /// Reports a build status against a commit.
    pub async fn create_status(
        &self,
        opts: &CommitsOptions,
        status: &CommitStatusOptions,
    ) -> Result<Value, ApiError> {
        let body = build_commit_status_body(status)?;
        let url = self.url(opts, "/repositories/%s/%s/commit/%s/statuses/build", "");
        self.call(Method::POST, &url, Some(body)).await
    }

    pub async fn approve(&self, opts: &CommitsOptions) -> Result<Value, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/commit/%s/approve", "");
        self.call(Method::POST, &url, None).await
    }

    pub async fn unapprove(&self, opts: &CommitsOptions) -> Result<Value, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/commit/%s/approve", "");
        self.call(Method::DELETE, &url, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_body() {
        let status = CommitStatusOptions {
            key: "ci".to_string(),
            state: "SUCCESSFUL".to_string(),
            url: "https://ci.example.com/1".to_string(),
            description: Some(String::new()),
            ..Default::default()
        };
        let body: Value = serde_json::from_str(&build_commit_status_body(&status).unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"key": "ci", "state": "SUCCESSFUL", "url": "https://ci.example.com/1"})
        );
    }

    #[test]
    fn test_options_builder() {
        let opts = CommitsOptions::new("acme", "api").revision("abc123");
        assert_eq!(opts.revision, "abc123");
        assert!(opts.include.is_none());
    }
}
