//
//  bitbucket-client
//  api/cloud/pipelines.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Repository pipeline configuration.
//!
//! Bitbucket Pipelines is configured per repository under
//! `/repositories/{owner}/{slug}/pipelines_config`:
//!
//! - enabling or disabling pipelines
//! - repository variables (optionally secured, i.e. masked in logs)
//! - the SSH key pair pipelines use to reach other hosts
//!
//! # Example
//!
//! ```rust,no_run
//! use bitbucket_client::{Client, Credentials};
//! use bitbucket_client::api::cloud::RepositoryPipelineVariableOptions;
//!
//! # async fn example() -> Result<(), bitbucket_client::ApiError> {
//! let client = Client::new(Credentials::basic("jdoe", "app-password"))?;
//! let variable = client
//!     .repository()
//!     .add_pipeline_variable(
//!         &RepositoryPipelineVariableOptions::new("acme", "api", "DEPLOY_TOKEN", "s3cr3t")
//!             .secured(true),
//!     )
//!     .await?;
//! println!("created {}", variable.uuid);
//! # Ok(())
//! # }
//! ```

use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{json_body, non_empty, Repository, RepositoryApi};
use crate::api::common::{decode, ApiError};

/// Pipeline configuration of a repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pipeline {
    /// Object type, `repository_pipelines_configuration`.
    #[serde(rename = "type")]
    pub pipeline_type: String,

    /// Whether pipelines run for this repository.
    pub enabled: bool,

    /// The repository the configuration belongs to.
    pub repository: Option<Repository>,
}

/// A repository-level pipeline variable.
///
/// # Notes
///
/// - Secured variables are masked with `***` in pipeline logs
/// - The API never returns the value of a secured variable
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineVariable {
    /// Object type, `pipeline_variable`.
    #[serde(rename = "type")]
    pub variable_type: String,

    /// Unique identifier for the variable (includes curly braces).
    pub uuid: String,

    /// The name of the variable.
    pub key: String,

    /// The value of the variable. Empty for secured variables.
    pub value: String,

    /// Whether this variable's value is masked.
    pub secured: bool,
}

/// The SSH key pair used by pipelines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineKeyPair {
    /// Object type, `pipeline_ssh_key_pair`.
    #[serde(rename = "type")]
    pub key_pair_type: String,

    pub uuid: String,

    /// The public key in OpenSSH format.
    pub public_key: String,

    /// The private key. Never returned by the API.
    pub private_key: String,
}

/// Options for enabling or disabling pipelines.
#[derive(Debug, Clone, Default)]
pub struct RepositoryPipelineOptions {
    pub owner: String,
    pub repo_slug: String,
    pub enabled: bool,
}

impl RepositoryPipelineOptions {
    pub fn new(owner: impl Into<String>, repo_slug: impl Into<String>, enabled: bool) -> Self {
        Self {
            owner: owner.into(),
            repo_slug: repo_slug.into(),
            enabled,
        }
    }
}

/// Options for creating a pipeline variable.
#[derive(Debug, Clone, Default)]
pub struct RepositoryPipelineVariableOptions {
    pub owner: String,
    pub repo_slug: String,
    /// Only sent when set.
    pub uuid: Option<String>,
    pub key: String,
    pub value: String,
    pub secured: bool,
}

impl RepositoryPipelineVariableOptions {
    pub fn new(
        owner: impl Into<String>,
        repo_slug: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo_slug: repo_slug.into(),
            key: key.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn secured(mut self, secured: bool) -> Self {
        self.secured = secured;
        self
    }

    pub fn uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }
}

/// Options for installing the pipelines SSH key pair.
#[derive(Debug, Clone, Default)]
pub struct RepositoryPipelineKeyPairOptions {
    pub owner: String,
    pub repo_slug: String,
    pub private_key: Option<String>,
    pub public_key: Option<String>,
}

#[derive(Serialize)]
struct PipelineConfigBody {
    enabled: bool,
}

#[derive(Serialize)]
struct PipelineVariableBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    uuid: Option<&'a str>,
    key: &'a str,
    value: &'a str,
    secured: bool,
}

#[derive(Serialize)]
struct PipelineKeyPairBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    private_key: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    public_key: Option<&'a str>,
}

/// `{"enabled": ...}`; the flag is always sent.
pub fn build_pipeline_body(opts: &RepositoryPipelineOptions) -> Result<String, ApiError> {
    json_body(&PipelineConfigBody {
        enabled: opts.enabled,
    })
}

/// Variable body; `uuid` is omitted unless set.
pub fn build_pipeline_variable_body(
    opts: &RepositoryPipelineVariableOptions,
) -> Result<String, ApiError> {
    json_body(&PipelineVariableBody {
        uuid: non_empty(&opts.uuid),
        key: &opts.key,
        value: &opts.value,
        secured: opts.secured,
    })
}

/// Key pair body; each key is omitted unless set.
pub fn build_pipeline_key_pair_body(
    opts: &RepositoryPipelineKeyPairOptions,
) -> Result<String, ApiError> {
    json_body(&PipelineKeyPairBody {
        private_key: non_empty(&opts.private_key),
        public_key: non_empty(&opts.public_key),
    })
}

impl<'a> RepositoryApi<'a> {
    /// Enables or disables pipelines for a repository.
    pub async fn update_pipeline_config(
        &self,
        opts: &RepositoryPipelineOptions,
    ) -> Result<Pipeline, ApiError> {
        let body = build_pipeline_body(opts)?;
        let url = self.client.request_url(
            "/repositories/%s/%s/pipelines_config",
            &[&opts.owner, &opts.repo_slug],
        );
        decode(self.client.execute(Method::PUT, &url, Some(body)).await?)
    }

    /// Creates a repository-level pipeline variable.
    pub async fn add_pipeline_variable(
        &self,
        opts: &RepositoryPipelineVariableOptions,
    ) -> Result<PipelineVariable, ApiError> {
        let body = build_pipeline_variable_body(opts)?;
        let url = self.client.request_url(
            "/repositories/%s/%s/pipelines_config/variables/",
            &[&opts.owner, &opts.repo_slug],
        );
        decode(self.client.execute(Method::POST, &url, Some(body)).await?)
    }

    /// Installs the SSH key pair used by pipelines.
    pub async fn add_pipeline_key_pair(
        &self,
        opts: &RepositoryPipelineKeyPairOptions,
    ) -> Result<PipelineKeyPair, ApiError> {
        let body = build_pipeline_key_pair_body(opts)?;
        let url = self.client.request_url(
            "/repositories/%s/%s/pipelines_config/ssh/key_pair",
            &[&opts.owner, &opts.repo_slug],
        );
        decode(self.client.execute(Method::PUT, &url, Some(body)).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn parse(body: &str) -> Value {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_pipeline_body_always_sends_enabled() {
        let body = build_pipeline_body(&RepositoryPipelineOptions::new("o", "r", false)).unwrap();
        assert_eq!(parse(&body), json!({"enabled": false}));
    }

    #[test]
    fn test_variable_body_omits_unset_uuid() {
        let opts = RepositoryPipelineVariableOptions::new("o", "r", "KEY", "v");
        assert_eq!(
            parse(&build_pipeline_variable_body(&opts).unwrap()),
            json!({"key": "KEY", "value": "v", "secured": false})
        );

        let opts = opts.uuid("").secured(true);
        assert_eq!(
            parse(&build_pipeline_variable_body(&opts).unwrap()),
            json!({"key": "KEY", "value": "v", "secured": true})
        );
    }

    #[test]
    fn test_variable_body_with_uuid() {
        let opts = RepositoryPipelineVariableOptions::new("o", "r", "KEY", "v").uuid("{abc}");
        let body = parse(&build_pipeline_variable_body(&opts).unwrap());
        assert_eq!(body["uuid"], "{abc}");
    }

    #[test]
    fn test_key_pair_body_only_set_keys() {
        let opts = RepositoryPipelineKeyPairOptions {
            public_key: Some("ssh-rsa AAAA".to_string()),
            private_key: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            parse(&build_pipeline_key_pair_body(&opts).unwrap()),
            json!({"public_key": "ssh-rsa AAAA"})
        );
    }

    #[test]
    fn test_decode_pipeline_variable() {
        let variable: PipelineVariable = decode(json!({
            "type": "pipeline_variable",
            "uuid": "{1}",
            "key": "KEY",
            "value": "v",
            "secured": false
        }))
        .unwrap();
        assert_eq!(
            variable,
            PipelineVariable {
                variable_type: "pipeline_variable".to_string(),
                uuid: "{1}".to_string(),
                key: "KEY".to_string(),
                value: "v".to_string(),
                secured: false,
            }
        );
    }

    #[test]
    fn test_decode_pipeline_config() {
        let pipeline: Pipeline = decode(json!({
            "type": "repository_pipelines_configuration",
            "enabled": true,
            "repository": {"full_name": "o/r", "type": "repository"}
        }))
        .unwrap();
        assert!(pipeline.enabled);
        assert_eq!(pipeline.repository.unwrap().full_name, "o/r");
    }

    #[test]
    fn test_error_envelope_for_every_entity() {
        let envelope = json!({"type": "error", "error": {"message": "denied"}});
        assert!(decode::<Pipeline>(envelope.clone()).unwrap_err().is_service_error());
        assert!(decode::<PipelineVariable>(envelope.clone())
            .unwrap_err()
            .is_service_error());
        assert!(decode::<PipelineKeyPair>(envelope).unwrap_err().is_service_error());
    }
}
