//
//  bitbucket-client
//  api/cloud/teams.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Team endpoints.
//!
//! Teams are shared accounts owning repositories and projects. Every
//! endpoint here returns the JSON tree unchanged, except
//! [`TeamsApi::projects`], which collects the names from a listing.
//!
//! # Team Hierarchy
//!
//! ```text
//! Team
//! ├── Projects (optional grouping)
//! │   └── Repositories
//! ├── Repositories (not in projects)
//! └── Members (users with access)
//! ```

use reqwest::Method;
use serde_json::Value;

use super::with_query;
use crate::api::common::{check_envelope, json_kind, ApiError, PaginatedResponse};
use crate::Client;

/// Team endpoints.
#[derive(Debug, Clone, Copy)]
pub struct TeamsApi<'a> {
    client: &'a Client,
}

impl<'a> TeamsApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Lists the teams the authenticated user has `role` in (`member`, `contributor`, `admin`).
    ///
    /// An empty role sends no filter.
    pub async fn list(&self, role: &str) -> Result<Value, ApiError> {
        let url = self.client.request_url("/teams/", &[""]);
        let url = if role.is_empty() {
            url
        } else {
            with_query(url, &[("role", role)])
        };
        self.get(&url).await
    }

    pub async fn profile(&self, team: &str) -> Result<Value, ApiError> {
        let url = self.client.request_url("/teams/%s/", &[team]);
        self.get(&url).await
    }

    pub async fn members(&self, team: &str) -> Result<Value, ApiError> {
        let url = self.client.request_url("/teams/%s/members", &[team]);
        self.get(&url).await
    }

    pub async fn followers(&self, team: &str) -> Result<Value, ApiError> {
        let url = self.client.request_url("/teams/%s/followers", &[team]);
        self.get(&url).await
    }

    pub async fn following(&self, team: &str) -> Result<Value, ApiError> {
        let url = self.client.request_url("/teams/%s/following", &[team]);
        self.get(&url).await
    }

    pub async fn repositories(&self, team: &str) -> Result<Value, ApiError> {
        let url = self.client.request_url("/teams/%s/repositories", &[team]);
        self.get(&url).await
    }

    /// Names of the entries in a team's repository listing.
    ///
    /// # Errors
    ///
    /// [`ApiError::Shape`] if the response has no `values` array or an entry
    /// lacks a string `name`.
    pub async fn projects(&self, team: &str) -> Result<Vec<String>, ApiError> {
        let response = self.repositories(team).await?;
        collect_names(response)
    }

    async fn get(&self, url: &str) -> Result<Value, ApiError> {
        check_envelope(self.client.execute(Method::GET, url, None).await?)
    }
}

/// Collects `values[].name` from a paginated listing.
pub fn collect_names(response: Value) -> Result<Vec<String>, ApiError> {
    if response.get("values").map_or(true, |v| !v.is_array()) {
        return Err(ApiError::Shape(format!(
            "expected an object with a `values` array, got {}",
            json_kind(&response)
        )));
    }

    let page: PaginatedResponse<Value> = serde_json::from_value(response)
        .map_err(|e| ApiError::Shape(format!("malformed listing: {}", e)))?;

    page.values
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            entry
                .get("name")
                .and_then(Value::as_str)
                .map(String::from)
                .ok_or_else(|| ApiError::Shape(format!("values[{}].name is not a string", i)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collect_names() {
        let names =
            collect_names(json!({"values": [{"name": "P1"}, {"name": "P2"}]})).unwrap();
        assert_eq!(names, vec!["P1", "P2"]);
    }

    #[test]
    fn test_collect_names_empty_page() {
        assert!(collect_names(json!({"values": []})).unwrap().is_empty());
    }

    #[test]
    fn test_collect_names_missing_values() {
        let err = collect_names(json!({"size": 0})).unwrap_err();
        assert!(matches!(err, ApiError::Shape(_)));
        let err = collect_names(Value::Null).unwrap_err();
        assert!(matches!(err, ApiError::Shape(_)));
    }

    #[test]
    fn test_collect_names_bad_entry() {
        let err = collect_names(json!({"values": [{"name": "P1"}, {"name": 7}]})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unexpected response shape: values[1].name is not a string"
        );
    }
}
