//
//  bitbucket-client
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Bitbucket Client Library
//!
//! An async client for the Bitbucket Cloud REST API v2.0.
//!
//! ## Overview
//!
//! A [`Client`] holds the base URL, the page length and the credentials.
//! Resource façades borrowed from it (`client.repositories()`,
//! `client.pull_requests()`, `client.teams()`, ...) expose one method per
//! endpoint. Responses come back either as typed entities or as the raw
//! [`serde_json::Value`] tree.
//!
//! ## Module Structure
//!
//! - [`api`]: The client, request executor, resource façades and decoders
//! - [`auth`]: Basic and OAuth 2.0 credentials, token exchange
//! - [`config`]: Base URL, page length and config file handling
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bitbucket_client::{Client, Credentials};
//!
//! # async fn example() -> Result<(), bitbucket_client::ApiError> {
//! let client = Client::new(Credentials::basic("jdoe", "app-password"))?
//!     .with_page_length(50);
//!
//! let projects = client.teams().projects("acme").await?;
//! for name in projects {
//!     println!("{}", name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Authentication
//!
//! | Scheme | Header |
//! |--------|--------|
//! | Basic (username + app password) | `Authorization: Basic ...` |
//! | OAuth 2.0 client credentials | `Authorization: Bearer ...` |
//!
//! OAuth clients call [`Client::authenticate`] once to obtain a token.

/// HTTP client, resource façades and response decoding.
pub mod api;

/// Credentials and OAuth 2.0 token handling.
pub mod auth;

/// Client configuration.
///
/// Resolved from defaults, the `BITBUCKET_API_BASE_URL` environment
/// variable, and an optional TOML file in the platform config directory:
/// - Linux: `~/.config/bitbucket-client/config.toml`
/// - macOS: `~/Library/Application Support/bitbucket-client/config.toml`
/// - Windows: `%APPDATA%\bitbucket-client\config.toml`
pub mod config;

pub use api::{ApiError, Client};
pub use auth::{Credentials, OAuthToken};
pub use config::ClientConfig;

/// Application name, used for the config directory and the `User-Agent`.
pub const APP_NAME: &str = "bitbucket-client";

/// Crate version, derived from Cargo.toml at compile time.
///
/// # Example
///
/// ```rust
/// use bitbucket_client::VERSION;
///
/// println!("bitbucket-client {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
