//
//  bitbucket-client
//  api/cloud/diff.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Diffs and patches between revisions.
//!
//! `spec` is a single commit hash or a `from..to` range. Responses are
//! plain text, so these calls use the raw executor and return a `String`.
//! An error envelope in place of the text yields [`ApiError::Service`].

use reqwest::Method;

use crate::api::common::{check_raw_envelope, ApiError};
use crate::Client;

#[derive(Debug, Clone, Default)]
pub struct DiffOptions {
    pub owner: String,
    pub repo_slug: String,
    pub spec: String,
}

impl DiffOptions {
    pub fn new(
        owner: impl Into<String>,
        repo_slug: impl Into<String>,
        spec: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo_slug: repo_slug.into(),
            spec: spec.into(),
        }
    }
}

/// Diff endpoints.
#[derive(Debug, Clone, Copy)]
pub struct DiffApi<'a> {
    client: &'a Client,
}

impl<'a> DiffApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Unified diff for `opts.spec`.
    pub async fn diff(&self, opts: &DiffOptions) -> Result<String, ApiError> {
        self.text(opts, "/repositories/%s/%s/diff/%s").await
    }

    /// Patch series for `opts.spec`.
    pub async fn patch(&self, opts: &DiffOptions) -> Result<String, ApiError> {
        self.text(opts, "/repositories/%s/%s/patch/%s").await
    }

    async fn text(&self, opts: &DiffOptions, template: &str) -> Result<String, ApiError> {
        let url = self
            .client
            .request_url(template, &[&opts.owner, &opts.repo_slug, &opts.spec]);
        let bytes = check_raw_envelope(self.client.execute_raw(Method::GET, &url, None).await?)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
