//
//  bitbucket-client
//  api/cloud/users.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! User endpoints.
//!
//! [`UsersApi`] reads public information about any account;
//! [`UserApi`] reads the account the client is authenticated as.

use reqwest::Method;
use serde_json::Value;

use crate::api::common::{check_envelope, ApiError};
use crate::Client;

/// Endpoints for arbitrary user accounts.
#[derive(Debug, Clone, Copy)]
pub struct UsersApi<'a> {
    client: &'a Client,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Public profile of a user.
    pub async fn get(&self, username: &str) -> Result<Value, ApiError> {
        let url = self.client.request_url("/users/%s/", &[username]);
        self.fetch(&url).await
    }

    pub async fn followers(&self, username: &str) -> Result<Value, ApiError> {
        let url = self.client.request_url("/users/%s/followers", &[username]);
        self.fetch(&url).await
    }

    pub async fn following(&self, username: &str) -> Result<Value, ApiError> {
        let url = self.client.request_url("/users/%s/following", &[username]);
        self.fetch(&url).await
    }

    pub async fn repositories(&self, username: &str) -> Result<Value, ApiError> {
        let url = self.client.request_url("/users/%s/repositories", &[username]);
        self.fetch(&url).await
    }

    async fn fetch(&self, url: &str) -> Result<Value, ApiError> {
        check_envelope(self.client.execute(Method::GET, url, None).await?)
    }
}

/// Endpoints for the authenticated user.
#[derive(Debug, Clone, Copy)]
pub struct UserApi<'a> {
    client: &'a Client,
}

impl<'a> UserApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Profile of the authenticated user.
    pub async fn profile(&self) -> Result<Value, ApiError> {
        let url = self.client.request_url("/user/", &[""]);
        check_envelope(self.client.execute(Method::GET, &url, None).await?)
    }

    /// Email addresses of the authenticated user.
    pub async fn emails(&self) -> Result<Value, ApiError> {
        let url = self.client.request_url("/user/emails", &[""]);
        check_envelope(self.client.execute(Method::GET, &url, None).await?)
    }
}
