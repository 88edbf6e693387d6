//
//  bitbucket-client
//  api/cloud/repository.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Single repository operations.
//!
//! Covers create/get/delete, watchers and forks, default reviewers, and
//! reading or committing files through the `src` endpoint. Pipeline
//! configuration for a repository lives in [`pipelines`](super::pipelines).

use std::path::PathBuf;

use reqwest::multipart::{Form, Part};
use reqwest::{Method, Response};
use serde::Serialize;
use serde_json::Value;

use super::{json_body, non_empty, ProjectKey, Repository};
use crate::api::common::{check_envelope, check_raw_envelope, decode, ApiError};
use crate::Client;

/// Revision used by [`RepositoryApi::get_file`] when none is given.
pub const DEFAULT_BRANCH: &str = "master";

/// Options identifying a repository, plus the optional fields sent on create.
///
/// Optional fields left as `None` (or set to an empty string) are not sent.
///
/// # Example
///
/// ```rust
/// use bitbucket_client::api::cloud::RepositoryOptions;
///
/// let opts = RepositoryOptions {
///     description: Some("REST API for the backend".to_string()),
///     is_private: Some(true),
///     project: Some("BACKEND".to_string()),
///     ..RepositoryOptions::new("acme", "backend-api")
/// };
/// assert_eq!(opts.repo_slug, "backend-api");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RepositoryOptions {
    pub owner: String,
    pub repo_slug: String,
    /// Source control system, `git`.
    pub scm: Option<String>,
    pub is_private: Option<bool>,
    pub description: Option<String>,
    /// `allow_forks`, `no_public_forks` or `no_forks`.
    pub fork_policy: Option<String>,
    pub language: Option<String>,
    pub has_issues: Option<bool>,
    pub has_wiki: Option<bool>,
    /// Key of the project to create the repository in.
    pub project: Option<String>,
}

impl RepositoryOptions {
    pub fn new(owner: impl Into<String>, repo_slug: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo_slug: repo_slug.into(),
            ..Default::default()
        }
    }
}

#[derive(Serialize)]
struct RepositoryBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    scm: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fork_policy: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    has_issues: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    has_wiki: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    project: Option<ProjectKey<'a>>,
}

/// JSON body for repository creation containing only the fields that were set.
pub fn build_repository_body(opts: &RepositoryOptions) -> Result<String, ApiError> {
    json_body(&RepositoryBody {
        scm: non_empty(&opts.scm),
        is_private: opts.is_private,
        description: non_empty(&opts.description),
        fork_policy: non_empty(&opts.fork_policy),
        language: non_empty(&opts.language),
        has_issues: opts.has_issues,
        has_wiki: opts.has_wiki,
        project: non_empty(&opts.project).map(|key| ProjectKey { key }),
    })
}

/// Where the content of an uploaded file comes from.
#[derive(Debug, Clone)]
pub enum UploadContent {
    /// A local file, sent as a multipart file part.
    File(PathBuf),
    /// In-memory text, sent as an url-encoded form field.
    Text(String),
}

/// Single repository endpoints.
#[derive(Debug, Clone, Copy)]
pub struct RepositoryApi<'a> {
    pub(super) client: &'a Client,
}

impl<'a> RepositoryApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn repo_url(&self, opts: &RepositoryOptions, suffix: &str) -> String {
        let template = format!("/repositories/%s/%s{}", suffix);
        self.client
            .request_url(&template, &[&opts.owner, &opts.repo_slug])
    }

    /// Creates a repository.
    pub async fn create(&self, opts: &RepositoryOptions) -> Result<Repository, ApiError> {
        let body = build_repository_body(opts)?;
        let url = self.repo_url(opts, "");
        decode(self.client.execute(Method::POST, &url, Some(body)).await?)
    }

    /// Fetches a repository.
    pub async fn get(&self, opts: &RepositoryOptions) -> Result<Repository, ApiError> {
        let url = self.repo_url(opts, "");
        decode(self.client.execute(Method::GET, &url, None).await?)
    }

    /// Deletes a repository. The response is normally empty ([`Value::Null`]).
    pub async fn delete(&self, opts: &RepositoryOptions) -> Result<Value, ApiError> {
        let url = self.repo_url(opts, "");
        check_envelope(self.client.execute(Method::DELETE, &url, None).await?)
    }

    pub async fn list_watchers(&self, opts: &RepositoryOptions) -> Result<Value, ApiError> {
        let url = self.repo_url(opts, "/watchers");
        check_envelope(self.client.execute(Method::GET, &url, None).await?)
    }

    pub async fn list_forks(&self, opts: &RepositoryOptions) -> Result<Value, ApiError> {
        let url = self.repo_url(opts, "/forks");
        check_envelope(self.client.execute(Method::GET, &url, None).await?)
    }

    /// Lists the default reviewers of a repository.
    pub async fn list_default_reviewers(
        &self,
        opts: &RepositoryOptions,
    ) -> Result<Value, ApiError> {
        let url = self.repo_url(opts, "/default-reviewers");
        check_envelope(self.client.execute(Method::GET, &url, None).await?)
    }

    /// Adds a user to the default reviewers.
    ///
    /// The username is not validated locally.
    pub async fn add_default_reviewer(
        &self,
        opts: &RepositoryOptions,
        username: &str,
    ) -> Result<(), ApiError> {
        let url = self.client.request_url(
            "/repositories/%s/%s/default-reviewers/%s",
            &[&opts.owner, &opts.repo_slug, username],
        );
        check_envelope(self.client.execute(Method::PUT, &url, None).await?)?;
        Ok(())
    }

    /// Removes a user from the default reviewers.
    pub async fn remove_default_reviewer(
        &self,
        opts: &RepositoryOptions,
        username: &str,
    ) -> Result<(), ApiError> {
        let url = self.client.request_url(
            "/repositories/%s/%s/default-reviewers/%s",
            &[&opts.owner, &opts.repo_slug, username],
        );
        check_envelope(self.client.execute(Method::DELETE, &url, None).await?)?;
        Ok(())
    }

    /// Commits a file to the repository through the `src` endpoint.
    ///
    /// `file_path` is the path inside the repository, e.g. `src/main/test.txt`.
    /// This request does not go through the JSON executor: its body is a form,
    /// so the content type differs. The raw response is returned for the
    /// caller to inspect.
    pub async fn upload_file(
        &self,
        opts: &RepositoryOptions,
        file_path: &str,
        content: UploadContent,
    ) -> Result<Response, ApiError> {
        let url = self.repo_url(opts, "/src");
        let request = self.client.http().post(&url);

        let request = match content {
            UploadContent::File(path) => {
                let bytes = tokio::fs::read(&path).await?;
                let file_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file_path.to_string());
                let part = Part::bytes(bytes).file_name(file_name);
                // The field name is the repository path and must go out unescaped.
                let form = Form::new()
                    .percent_encode_noop()
                    .part(file_path.to_string(), part);
                request.multipart(form)
            }
            UploadContent::Text(text) => request.form(&[(file_path, text.as_str())]),
        };

        tracing::debug!("POST {} (upload {})", url, file_path);
        let response = self.client.auth().sign(request).send().await?;
        tracing::debug!("POST {} -> {}", url, response.status());
        Ok(response)
    }

    /// Fetches the raw content of a file at a revision.
    ///
    /// An empty `revision` means [`DEFAULT_BRANCH`]. A body that is the error
    /// envelope yields [`ApiError::Service`].
    pub async fn get_file(
        &self,
        opts: &RepositoryOptions,
        revision: &str,
        path: &str,
    ) -> Result<Vec<u8>, ApiError> {
        let revision = if revision.is_empty() {
            DEFAULT_BRANCH
        } else {
            revision
        };
        let url = self.client.request_url(
            "/repositories/%s/%s/src/%s/%s",
            &[
                &opts.owner,
                &opts.repo_slug,
                revision,
                path.trim_start_matches('/'),
            ],
        );
        check_raw_envelope(self.client.execute_raw(Method::GET, &url, None).await?)
    }
}
