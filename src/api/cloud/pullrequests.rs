//
//  bitbucket-client
//  api/cloud/pullrequests.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pull request endpoints.
//!
//! # Pull Request Lifecycle
//!
//! ```text
//! OPEN -> MERGED
//!      \-> DECLINED
//!      \-> SUPERSEDED
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use bitbucket_client::{Client, Credentials};
//! use bitbucket_client::api::cloud::PullRequestsOptions;
//!
//! # async fn example() -> Result<(), bitbucket_client::ApiError> {
//! let client = Client::new(Credentials::basic("jdoe", "app-password"))?;
//! let opts = PullRequestsOptions {
//!     title: Some("Add user authentication".to_string()),
//!     source_branch: Some("feature/auth".to_string()),
//!     destination_branch: Some("main".to_string()),
//!     close_source_branch: true,
//!     ..PullRequestsOptions::new("acme", "api")
//! };
//! let pr = client.pull_requests().create(&opts).await?;
//! println!("#{}", pr["id"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Notes
//!
//! - Pull requests are numbered sequentially within each repository
//! - The source branch can optionally be deleted upon merge

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::{json_body, non_empty, with_query};
use crate::api::common::{check_envelope, check_raw_envelope, ApiError};
use crate::Client;

/// Options for pull request operations.
///
/// `id` addresses an existing pull request; the remaining optional fields
/// form the create/update/merge bodies and are only sent when set.
#[derive(Debug, Clone, Default)]
pub struct PullRequestsOptions {
    pub owner: String,
    pub repo_slug: String,
    /// Pull request number, for operations on one pull request.
    pub id: String,
    /// Comment identifier, for [`PullRequestsApi::comment`].
    pub comment_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub close_source_branch: bool,
    pub source_branch: Option<String>,
    pub source_commit: Option<String>,
    /// `{owner}/{slug}` of a fork to merge from.
    pub source_repository: Option<String>,
    pub destination_branch: Option<String>,
    pub destination_commit: Option<String>,
    /// Reviewer account UUIDs.
    pub reviewers: Vec<String>,
    /// State filter for listings: `OPEN`, `MERGED`, `DECLINED`, `SUPERSEDED`.
    pub states: Vec<String>,
    /// Merge commit message.
    pub message: Option<String>,
    /// `merge_commit`, `squash` or `fast_forward`.
    pub merge_strategy: Option<String>,
}

impl PullRequestsOptions {
    pub fn new(owner: impl Into<String>, repo_slug: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo_slug: repo_slug.into(),
            ..Default::default()
        }
    }

    pub fn id(mut self, id: impl ToString) -> Self {
        self.id = id.to_string();
        self
    }
}

#[derive(Debug, Serialize)]
struct BranchName<'a> {
    name: &'a str,
}

#[derive(Debug, Serialize)]
struct CommitHash<'a> {
    hash: &'a str,
}

#[derive(Debug, Serialize)]
struct RepositoryName<'a> {
    full_name: &'a str,
}

#[derive(Debug, Serialize)]
struct BranchSpec<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    branch: Option<BranchName<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit: Option<CommitHash<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    repository: Option<RepositoryName<'a>>,
}

impl<'a> BranchSpec<'a> {
    fn new(branch: Option<&'a str>, commit: Option<&'a str>, repository: Option<&'a str>) -> Option<Self> {
        if branch.is_none() && commit.is_none() && repository.is_none() {
            return None;
        }
        Some(Self {
            branch: branch.map(|name| BranchName { name }),
            commit: commit.map(|hash| CommitHash { hash }),
            repository: repository.map(|full_name| RepositoryName { full_name }),
        })
    }
}

#[derive(Debug, Serialize)]
struct UserUuid<'a> {
    uuid: &'a str,
}

#[derive(Debug, Serialize)]
struct PullRequestBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<BranchSpec<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    destination: Option<BranchSpec<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    reviewers: Vec<UserUuid<'a>>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    close_source_branch: bool,
}

#[derive(Debug, Serialize)]
struct MergeBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    close_source_branch: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    merge_strategy: Option<&'a str>,
}

/// Create/update body with only the fields that were set.
pub fn build_pull_request_body(opts: &PullRequestsOptions) -> Result<String, ApiError> {
    json_body(&PullRequestBody {
        title: non_empty(&opts.title),
        description: non_empty(&opts.description),
        source: BranchSpec::new(
            non_empty(&opts.source_branch),
            non_empty(&opts.source_commit),
            non_empty(&opts.source_repository),
        ),
        destination: BranchSpec::new(
            non_empty(&opts.destination_branch),
            non_empty(&opts.destination_commit),
            None,
        ),
        reviewers: opts
            .reviewers
            .iter()
            .filter(|r| !r.is_empty())
            .map(|uuid| UserUuid { uuid: uuid.as_str() })
            .collect(),
        close_source_branch: opts.close_source_branch,
    })
}

/// Merge body with only the fields that were set.
pub fn build_merge_body(opts: &PullRequestsOptions) -> Result<String, ApiError> {
    json_body(&MergeBody {
        message: non_empty(&opts.message),
        close_source_branch: opts.close_source_branch,
        merge_strategy: non_empty(&opts.merge_strategy),
    })
}

/// Pull request endpoints.
#[derive(Debug, Clone, Copy)]
pub struct PullRequestsApi<'a> {
    client: &'a Client,
}

impl<'a> PullRequestsApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn url(&self, opts: &PullRequestsOptions, template: &str) -> String {
        self.client
            .request_url(template, &[&opts.owner, &opts.repo_slug, &opts.id, &opts.comment_id])
    }

    async fn call(&self, method: Method, url: &str, body: Option<String>) -> Result<Value, ApiError> {
        check_envelope(self.client.execute(method, url, body).await?)
    }

    async fn text(&self, url: &str) -> Result<String, ApiError> {
        let bytes = check_raw_envelope(self.client.execute_raw(Method::GET, url, None).await?)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Opens a pull request.
    pub async fn create(&self, opts: &PullRequestsOptions) -> Result<Value, ApiError> {
        let body = build_pull_request_body(opts)?;
        let url = self.url(opts, "/repositories/%s/%s/pullrequests/");
        self.call(Method::POST, &url, Some(body)).await
    }

    /// Updates the title, description, destination or reviewers.
    pub async fn update(&self, opts: &PullRequestsOptions) -> Result<Value, ApiError> {
        let body = build_pull_request_body(opts)?;
        let url = self.url(opts, "/repositories/%s/%s/pullrequests/%s");
        self.call(Method::PUT, &url, Some(body)).await
    }

    /// Lists pull requests, filtered by `opts.states` when non-empty.
    pub async fn list(&self, opts: &PullRequestsOptions) -> Result<Value, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/pullrequests/");
        let states: Vec<(&str, &str)> = opts
            .states
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| ("state", s.as_str()))
            .collect();
        let url = with_query(url, &states);
        self.call(Method::GET, &url, None).await
    }

    pub async fn get(&self, opts: &PullRequestsOptions) -> Result<Value, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/pullrequests/%s");
        self.call(Method::GET, &url, None).await
    }

    /// Activity across all pull requests of the repository.
    pub async fn activities(&self, opts: &PullRequestsOptions) -> Result<Value, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/pullrequests/activity");
        self.call(Method::GET, &url, None).await
    }

    /// Activity of one pull request.
    pub async fn activity(&self, opts: &PullRequestsOptions) -> Result<Value, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/pullrequests/%s/activity");
        self.call(Method::GET, &url, None).await
    }

    pub async fn commits(&self, opts: &PullRequestsOptions) -> Result<Value, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/pullrequests/%s/commits");
        self.call(Method::GET, &url, None).await
    }

    /// The pull request as a patch series.
    pub async fn patch(&self, opts: &PullRequestsOptions) -> Result<String, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/pullrequests/%s/patch");
        self.text(&url).await
    }

    /// The pull request as a unified diff.
    pub async fn diff(&self, opts: &PullRequestsOptions) -> Result<String, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/pullrequests/%s/diff");
        self.text(&url).await
    }

    pub async fn merge(&self, opts: &PullRequestsOptions) -> Result<Value, ApiError> {
        let body = build_merge_body(opts)?;
        let url = self.url(opts, "/repositories/%s/%s/pullrequests/%s/merge");
        self.call(Method::POST, &url, Some(body)).await
    }

    pub async fn decline(&self, opts: &PullRequestsOptions) -> Result<Value, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/pullrequests/%s/decline");
        self.call(Method::POST, &url, None).await
    }

    pub async fn approve(&self, opts: &PullRequestsOptions) -> Result<Value, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/pullrequests/%s/approve");
        self.call(Method::POST, &url, None).await
    }

    pub async fn unapprove(&self, opts: &PullRequestsOptions) -> Result<Value, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/pullrequests/%s/approve");
        self.call(Method::DELETE, &url, None).await
    }

    pub async fn comments(&self, opts: &PullRequestsOptions) -> Result<Value, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/pullrequests/%s/comments/");
        self.call(Method::GET, &url, None).await
    }

    pub async fn comment(&self, opts: &PullRequestsOptions) -> Result<Value, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/pullrequests/%s/comments/%s");
        self.call(Method::GET, &url, None).await
    }
}
