//
//  bitbucket-client
//  api/cloud/webhooks.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository webhooks.
//!
//! Webhooks notify an external URL when repository events happen, for
//! example `repo:push` or `pullrequest:created`.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{json_body, non_empty};
use crate::api::common::{check_envelope, decode, ApiError};
use crate::Client;

/// A webhook subscription.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Webhook {
    /// Unique identifier (includes curly braces).
    pub uuid: String,
    pub url: String,
    pub description: Option<String>,
    /// What the hook is attached to, `repository` or `workspace`.
    pub subject_type: String,
    pub active: bool,
    pub events: Vec<String>,
    pub skip_cert_verification: bool,
    pub created_at: Option<String>,
}

/// Options for webhook operations.
#[derive(Debug, Clone)]
pub struct WebhooksOptions {
    pub owner: String,
    pub repo_slug: String,
    /// Webhook UUID, for operations on one hook.
    pub uuid: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub active: bool,
    pub events: Vec<String>,
}

impl Default for WebhooksOptions {
    fn default() -> Self {
        Self {
            owner: String::new(),
            repo_slug: String::new(),
            uuid: String::new(),
            description: None,
            url: None,
            active: true,
            events: Vec::new(),
        }
    }
}

impl WebhooksOptions {
    pub fn new(owner: impl Into<String>, repo_slug: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo_slug: repo_slug.into(),
            ..Default::default()
        }
    }

    pub fn uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = uuid.into();
        self
    }
}

#[derive(Serialize)]
struct WebhookBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
    active: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    events: Vec<&'a str>,
}

/// Webhook body; `active` is always sent, the rest only when set.
pub fn build_webhook_body(opts: &WebhooksOptions) -> Result<String, ApiError> {
    json_body(&WebhookBody {
        description: non_empty(&opts.description),
        url: non_empty(&opts.url),
        active: opts.active,
        events: opts
            .events
            .iter()
            .map(String::as_str)
            .filter(|e| !e.is_empty())
            .collect(),
    })
}

/// Webhook endpoints.
#[derive(Debug, Clone, Copy)]
pub struct WebhooksApi<'a> {
    client: &'a Client,
}

impl<'a> WebhooksApi<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    fn url(&self, opts: &WebhooksOptions, template: &str) -> String {
        self.client
            .request_url(template, &[&opts.owner, &opts.repo_slug, &opts.uuid])
    }

    pub async fn list(&self, opts: &WebhooksOptions) -> Result<Value, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/hooks/");
        check_envelope(self.client.execute(Method::GET, &url, None).await?)
    }

    /// Subscribes `opts.url` to `opts.events`.
    pub async fn create(&self, opts: &WebhooksOptions) -> Result<Webhook, ApiError> {
        let body = build_webhook_body(opts)?;
        let url = self.url(opts, "/repositories/%s/%s/hooks/");
        decode(self.client.execute(Method::POST, &url, Some(body)).await?)
    }

    pub async fn get(&self, opts: &WebhooksOptions) -> Result<Webhook, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/hooks/%s");
        decode(self.client.execute(Method::GET, &url, None).await?)
    }

    pub async fn update(&self, opts: &WebhooksOptions) -> Result<Webhook, ApiError> {
        let body = build_webhook_body(opts)?;
        let url = self.url(opts, "/repositories/%s/%s/hooks/%s");
        decode(self.client.execute(Method::PUT, &url, Some(body)).await?)
    }

    pub async fn delete(&self, opts: &WebhooksOptions) -> Result<Value, ApiError> {
        let url = self.url(opts, "/repositories/%s/%s/hooks/%s");
        check_envelope(self.client.execute(Method::DELETE, &url, None).await?)
    }
}
