//
//  bitbucket-client
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Client configuration for the Bitbucket Cloud API: the API root, the page
//! length used for paginated collection endpoints, and the OAuth token
//! endpoint.
//!
//! ## Sources
//!
//! Configuration is resolved from, in order of precedence:
//!
//! - Explicit builder calls on [`Client`](crate::Client) (`with_base_url`, `with_page_length`)
//! - The `BITBUCKET_API_BASE_URL` environment variable
//! - A TOML file (see [`ClientConfig::load`])
//! - Built-in defaults
//!
//! ## Example Configuration File
//!
//! ```toml
//! base_url = "https://api.bitbucket.org/2.0"
//! page_length = 50
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bitbucket_client::config::ClientConfig;
//!
//! let config = ClientConfig::load_default()?;
//! println!("API root: {}", config.base_url);
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the API root.
pub const BASE_URL_ENV: &str = "BITBUCKET_API_BASE_URL";

/// The public Bitbucket Cloud API root.
pub const DEFAULT_BASE_URL: &str = "https://api.bitbucket.org/2.0";

/// OAuth 2.0 token endpoint used for client-credentials and refresh grants.
pub const DEFAULT_TOKEN_URL: &str = "https://bitbucket.org/site/oauth2/access_token";

/// Page length the API uses when none is requested.
///
/// A `pagelen` query parameter is only sent when the configured page length
/// differs from this value.
pub const DEFAULT_PAGE_LENGTH: u64 = 10;

/// Client configuration.
///
/// Immutable once handed to a [`Client`](crate::Client); build a new client
/// for a different configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root all endpoint paths are appended to, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Items per page for collection endpoints under `/repositories/`.
    #[serde(default = "default_page_length")]
    pub page_length: u64,

    /// OAuth 2.0 token endpoint.
    #[serde(default = "default_token_url")]
    pub token_url: String,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_length() -> u64 {
    DEFAULT_PAGE_LENGTH
}

fn default_token_url() -> String {
    DEFAULT_TOKEN_URL.to_string()
}

fn default_user_agent() -> String {
    format!("{}/{}", crate::APP_NAME, crate::VERSION)
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_length: default_page_length(),
            token_url: default_token_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Defaults, with the API root taken from `BITBUCKET_API_BASE_URL` when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Loads configuration from a TOML file, then applies the environment override.
    ///
    /// Missing keys fall back to their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env();
        Ok(config)
    }

    /// Loads the platform config file if it exists, otherwise [`ClientConfig::from_env`].
    pub fn load_default() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::from_env())
        }
    }

    /// Location of the platform config file.
    ///
    /// - Linux: `~/.config/bitbucket-client/config.toml`
    /// - macOS: `~/Library/Application Support/bitbucket-client/config.toml`
    /// - Windows: `%APPDATA%\bitbucket-client\config.toml`
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Parses a TOML document into a configuration.
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.base_url = normalize_base_url(&config.base_url);
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.base_url = normalize_base_url(&url);
            }
        }
    }
}

/// Strips surrounding whitespace and trailing slashes so templates can start with `/`.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
