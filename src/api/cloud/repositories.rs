//
//  bitbucket-client
//  api/cloud/repositories.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository collections and the repository entity.
//!
//! # Overview
//!
//! Repositories belong to an owner (a user or team) and optionally to a
//! project within that owner. The collection endpoints live under
//! `/repositories/{owner}`, which is also where the client injects the
//! configured `pagelen`.
//!
//! # Example
//!
//! ```rust,no_run
//! use bitbucket_client::{Client, Credentials};
//! use bitbucket_client::api::cloud::ProjectRepositoryOptions;
//!
//! # async fn example() -> Result<(), bitbucket_client::ApiError> {
//! let client = Client::new(Credentials::basic("jdoe", "app-password"))?;
//! let page = client
//!     .repositories()
//!     .list_for_project(&ProjectRepositoryOptions::new("acme", "BACKEND"))
//!     .await?;
//! println!("{}", page["values"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Notes
//!
//! - Repository slugs are URL-safe versions of repository names
//! - The `full_name` field follows the format `{owner}/{repo_slug}`

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{
    non_empty, with_query, BranchRestrictionsApi, CommitsApi, DiffApi, PullRequestsApi,
    RepositoryApi, WebhooksApi,
};
use crate::api::common::{check_envelope, ApiError};
use crate::Client;

/// Represents a Bitbucket Cloud repository.
///
/// Populated from the API response by field name; fields missing from the
/// response keep their defaults.
///
/// # Example
///
/// ```rust
/// use bitbucket_client::api::cloud::Repository;
///
/// fn display_repo(repo: &Repository) {
///     println!("Repository: {}", repo.full_name);
///     if let Some(ref project) = repo.project {
///         println!("  Project: {} ({})", project.name, project.key);
///     }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    /// Project the repository is organized under.
    pub project: Option<Project>,

    /// URL-safe identifier derived from the repository name.
    pub slug: String,

    /// Full path in format `{owner}/{repo_slug}`.
    pub full_name: String,

    /// Optional description of the repository's purpose.
    pub description: String,

    /// One of `allow_forks`, `no_public_forks`, `no_forks`.
    pub fork_policy: String,

    /// Object type, `repository` for this entity.
    #[serde(rename = "type")]
    pub repo_type: String,

    /// Whether the repository is private.
    pub is_private: Option<bool>,

    /// Primary programming language tag.
    pub language: Option<String>,

    /// The user or team that owns this repository, as returned by the API.
    pub owner: Map<String, Value>,

    /// HATEOAS links (`self`, `html`, `clone`, ...), as returned by the API.
    pub links: Map<String, Value>,
}

/// A project within a team or user account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    /// Short alphanumeric key for the project (typically uppercase).
    pub key: String,

    /// Human-readable name of the project.
    pub name: String,
}

/// Project key for assigning a repository to a project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectKey<'a> {
    /// The short alphanumeric key identifying the project.
    pub key: &'a str,
}

/// Options for the owner-scoped repository listings.
#[derive(Debug, Clone, Default)]
pub struct RepositoriesOptions {
    /// User or team owning the repositories.
    pub owner: String,
    /// Optional role filter: `member`, `contributor` or `admin`.
    pub role: Option<String>,
}

impl RepositoriesOptions {
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            role: None,
        }
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// Options for listing the repositories of one project.
#[derive(Debug, Clone)]
pub struct ProjectRepositoryOptions {
    /// User or team owning the project.
    pub owner: String,
    /// The project key.
    pub project: String,
    /// Items per page.
    pub page_length: u64,
    /// 1-indexed page number.
    pub page: u64,
}

impl ProjectRepositoryOptions {
    pub fn new(owner: impl Into<String>, project: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            project: project.into(),
            page_length: crate::config::DEFAULT_PAGE_LENGTH,
            page: 1,
        }
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = page;
        self
    }

    pub fn page_length(mut self, page_length: u64) -> Self {
        self.page_length = page_length;
        self
    }

    /// The encoded `q`, `pagelen` and `page` query string.
    pub(crate) fn query(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("page", &self.page.to_string())
            .append_pair("pagelen", &self.page_length.to_string())
            .append_pair("q", &format!("project.key=\"{}\"", self.project))
            .finish()
    }
}

/// Repository collection endpoints, plus access to the per-repository façades.
#[derive(Debug, Clone, Copy)]
pub struct RepositoriesApi<'a> {
    client: &'a Client,
}

impl<'a> RepositoriesApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Lists the repositories of a user account.
    pub async fn list_for_account(&self, opts: &RepositoriesOptions) -> Result<Value, ApiError> {
        self.list_for_owner(opts).await
    }

    /// Lists the repositories of a team.
    pub async fn list_for_team(&self, opts: &RepositoriesOptions) -> Result<Value, ApiError> {
        self.list_for_owner(opts).await
    }

    /// Lists all public repositories.
    pub async fn list_public(&self) -> Result<Value, ApiError> {
        let url = self.client.request_url("/repositories/", &[""]);
        check_envelope(self.client.execute(Method::GET, &url, None).await?)
    }

    /// Lists one page of repositories belonging to a project.
    ///
    /// Sends `q=project.key="{project}"` with the page and page length from `opts`.
    pub async fn list_for_project(
        &self,
        opts: &ProjectRepositoryOptions,
    ) -> Result<Value, ApiError> {
        let query = opts.query();
        let url = self
            .client
            .request_url("/repositories/%s?%s", &[&opts.owner, &query]);
        check_envelope(self.client.execute(Method::GET, &url, None).await?)
    }

    async fn list_for_owner(&self, opts: &RepositoriesOptions) -> Result<Value, ApiError> {
        let url = self.client.request_url("/repositories/%s", &[&opts.owner]);
        let url = match non_empty(&opts.role) {
            Some(role) => with_query(url, &[("role", role)]),
            None => url,
        };
        check_envelope(self.client.execute(Method::GET, &url, None).await?)
    }

    /// Single repository endpoints, same as [`Client::repository`].
    pub fn repository(&self) -> RepositoryApi<'a> {
        RepositoryApi::new(self.client)
    }

    /// Pull request endpoints.
    pub fn pull_requests(&self) -> PullRequestsApi<'a> {
        PullRequestsApi::new(self.client)
    }

    /// Commit endpoints.
    pub fn commits(&self) -> CommitsApi<'a> {
        CommitsApi::new(self.client)
    }

    /// Diff and patch endpoints.
    pub fn diff(&self) -> DiffApi<'a> {
        DiffApi::new(self.client)
    }

    /// Branch restriction endpoints.
    pub fn branch_restrictions(&self) -> BranchRestrictionsApi<'a> {
        BranchRestrictionsApi::new(self.client)
    }

    /// Webhook endpoints.
    pub fn webhooks(&self) -> WebhooksApi<'a> {
        WebhooksApi::new(self.client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::decode;
    use serde_json::json;

    #[test]
    fn test_project_query_encodes_quotes() {
        let query = ProjectRepositoryOptions::new("acme", "BACK END")
            .page(2)
            .page_length(25)
            .query();
        assert_eq!(query, "page=2&pagelen=25&q=project.key%3D%22BACK+END%22");
    }

    #[test]
    fn test_decode_repository() {
        let repo: Repository = decode(json!({
            "type": "repository",
            "slug": "api",
            "full_name": "acme/api",
            "description": "",
            "fork_policy": "no_forks",
            "is_private": true,
            "project": {"key": "BACK", "name": "Backend", "type": "project"},
            "owner": {"username": "acme"},
            "links": {"html": {"href": "https://bitbucket.org/acme/api"}},
            "size": 1234
        }))
        .unwrap();

        assert_eq!(repo.full_name, "acme/api");
        assert_eq!(repo.repo_type, "repository");
        assert_eq!(repo.is_private, Some(true));
        assert_eq!(
            repo.project,
            Some(Project {
                key: "BACK".to_string(),
                name: "Backend".to_string()
            })
        );
        assert_eq!(repo.owner["username"], "acme");
    }

    #[test]
    fn test_decode_repository_error_envelope() {
        let err = decode::<Repository>(json!({
            "type": "error",
            "error": {"message": "Repository acme/missing not found"}
        }))
        .unwrap_err();
        assert!(err.is_service_error());
    }

    #[test]
    fn test_decode_repository_type_mismatch() {
        let err = decode::<Repository>(json!({"slug": ["not", "a", "string"]})).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
