//
//  bitbucket-client
//  api/cloud/branch_restrictions.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Branch permission rules.
//!
//! A restriction applies one `kind` of rule (`push`, `force`, `delete`,
//! `require_approvals_to_merge`, ...) to the branches matched either by a
//! glob `pattern` or by a `branch_type` from the branching model.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{json_body, non_empty};
use crate::api::common::{check_envelope, decode, ApiError};
use crate::Client;

/// A branch restriction rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchRestriction {
    pub id: u64,
    pub kind: String,
    /// `glob` or `branching_model`.
    pub branch_match_kind: String,
    pub branch_type: Option<String>,
    pub pattern: String,
    /// Numeric parameter of the rule, e.g. the number of approvals.
    pub value: Option<u64>,
    pub users: Vec<Map<String, Value>>,
    pub groups: Vec<Map<String, Value>>,
}

/// Options for branch restriction operations.
#[derive(Debug, Clone, Default)]
pub struct BranchRestrictionsOptions {
    pub owner: String,
    pub repo_slug: String,
    /// Restriction identifier, for operations on one rule.
    pub id: String,
    pub kind: String,
    pub pattern: Option<String>,
    pub branch_match_kind: Option<String>,
    pub branch_type: Option<String>,
    pub value: Option<u64>,
    /// Usernames exempt from the rule.
    pub users: Vec<String>,
    /// Group slugs exempt from the rule.
    pub groups: Vec<String>,
}

impl BranchRestrictionsOptions {
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

#[derive(Serialize)]
struct Username<'a> {
    username: &'a str,
}

#[derive(Serialize)]
struct GroupSlug<'a> {
    slug: &'a str,
}

#[derive(Serialize)]
struct BranchRestrictionBody<'a> {
    kind: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pattern: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch_match_kind: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    branch_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<u64>,
    users: Vec<Username<'a>>,
    groups: Vec<GroupSlug<'a>>,
}

/// Rule body. `users` and `groups` are always sent so an update can clear them.
pub fn build_branch_restriction_body(opts: &BranchRestrictionsOptions) -> Result<String, ApiError> {
    json_body(&BranchRestrictionBody {
        kind: &opts.kind,
        pattern: non_empty(&opts.pattern),
        branch_match_kind: non_empty(&opts.branch_match_kind),
        branch_type: non_empty(&opts.branch_type),
        value: opts.value,
        users: opts
            .users
            .iter()
            .map(|username| Username { username: username.as_str() })
            .collect(),
        groups: opts
            .groups
            .iter()
            .map(|slug| GroupSlug { slug: slug.as_str() })
            .collect(),
    })
}

/// Branch restriction endpoints.
#[derive(Debug, Clone, Copy)]
pub struct BranchRestrictionsApi<'a> {
    client: &'a Client,
}

impl<'a> BranchRestrictionsApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn url(&self, opts: &BranchRestrictionsOptions, template: &str) -> String {
        self.client
            .request_url(template, &[&opts.owner, &opts.repo_slug, &opts.id])
    }

    pub async fn list(&self, opts: &BranchRestrictionsOptions) -> Result<Value, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/branch-restrictions");
        check_envelope(self.client.execute(Method::GET, &url, None).await?)
    }

    pub async fn create(
        &self,
        opts: &BranchRestrictionsOptions,
    ) -> Result<BranchRestriction, ApiError> {
        let body = build_branch_restriction_body(opts)?;
        let url = self.url(opts, "/repositories/%s/%s/branch-restrictions");
        decode(self.client.execute(Method::POST, &url, Some(body)).await?)
    }

    pub async fn get(&self, opts: &BranchRestrictionsOptions) -> Result<BranchRestriction, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/branch-restrictions/%s");
        decode(self.client.execute(Method::GET, &url, None).await?)
    }

    pub async fn update(
        &self,
        opts: &BranchRestrictionsOptions,
    ) -> Result<BranchRestriction, ApiError> {
        let body = build_branch_restriction_body(opts)?;
        let url = self.url(opts, "/repositories/%s/%s/branch-restrictions/%s");
        decode(self.client.execute(Method::PUT, &url, Some(body)).await?)
    }

    pub async fn delete(&self, opts: &BranchRestrictionsOptions) -> Result<Value, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/branch-restrictions/%s");
        check_envelope(self.client.execute(Method::DELETE, &url, None).await?)
    }
}
