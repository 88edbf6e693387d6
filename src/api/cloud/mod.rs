//
//  bitbucket-client
//  api/cloud/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Bitbucket Cloud API v2.0 resource façades.
//!
//! Each façade is a thin borrow of the [`Client`](crate::Client) exposing one
//! method per endpoint. Every method follows the same template:
//!
//! 1. Build the URL (and, for writes, a JSON body of only the fields set)
//! 2. Run the request through the client's executor
//! 3. Decode into a typed entity, or hand the JSON tree back unchanged
//!
//! # Module Organization
//!
//! - [`repositories`] - Repository collections and the [`Repository`] entity
//! - [`repository`] - Single repository operations, files, default reviewers
//! - [`pipelines`] - Pipeline configuration, variables and SSH key pairs
//! - [`teams`] - Team profiles, members and projects
//! - [`users`] - Users and the authenticated user
//! - [`pullrequests`] - Pull request workflows
//! - [`commits`] - Commits, comments, build statuses and approvals
//! - [`diff`] - Diffs and patches
//! - [`branch_restrictions`] - Branch permission rules
//! - [`webhooks`] - Repository webhooks
//!
//! # Example
//!
//! ```rust,no_run
//! use bitbucket_client::{Client, Credentials};
//! use bitbucket_client::api::cloud::RepositoryOptions;
//!
//! # async fn example() -> Result<(), bitbucket_client::ApiError> {
//! let client = Client::new(Credentials::basic("jdoe", "app-password"))?;
//! let repo = client
//!     .repository()
//!     .get(&RepositoryOptions::new("acme", "api"))
//!     .await?;
//! println!("{}", repo.full_name);
//! # Ok(())
//! # }
//! ```

use serde::Serialize;

use crate::api::common::ApiError;

pub mod branch_restrictions;
pub mod commits;
pub mod diff;
pub mod pipelines;
pub mod pullrequests;
pub mod repositories;
pub mod repository;
pub mod teams;
pub mod users;
pub mod webhooks;

pub use branch_restrictions::*;
pub use commits::*;
pub use diff::*;
pub use pipelines::*;
pub use pullrequests::*;
pub use repositories::*;
pub use repository::*;
pub use teams::*;
pub use users::*;
pub use webhooks::*;

/// Treats an empty string the same as an unset field.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Serializes a request body to JSON text.
pub(crate) fn json_body<T: Serialize>(body: &T) -> Result<String, ApiError> {
    Ok(serde_json::to_string(body)?)
}

/// Appends an url-encoded query string to `url` when `pairs` is non-empty.
pub(crate) fn with_query(mut url: String, pairs: &[(&str, &str)]) -> String {
    if pairs.is_empty() {
        return url;
    }
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    url.push(if url.contains('?') { '&' } else { '?' });
    url.push_str(&query);
    url
}
