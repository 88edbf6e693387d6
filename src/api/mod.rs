//
//  bitbucket-client
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! HTTP plumbing for the Bitbucket Cloud REST API v2.0.
//!
//! ## Architecture
//!
//! - [`client`]: The [`Client`], URL building and the request executor
//! - [`cloud`]: Resource façades (repositories, pull requests, teams, ...)
//! - [`common`]: [`ApiError`], error envelope detection, decoding, pagination
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bitbucket_client::api::Client;
//! use bitbucket_client::auth::Credentials;
//!
//! # async fn example() -> Result<(), bitbucket_client::ApiError> {
//! let client = Client::new(Credentials::oauth("client-id", "secret"))?
//!     .authenticate()
//!     .await?;
//! let me = client.user().profile().await?;
//! println!("{}", me["display_name"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! The service reports failures in the body as `{"type": "error", ...}`.
//! Such bodies become [`ApiError::Service`]; HTTP status codes are not
//! interpreted.

/// The client and its request executor.
pub mod client;

/// Bitbucket Cloud resource façades.
pub mod cloud;

/// Error type, envelope detection and decoding helpers.
pub mod common;

pub use client::Client;
pub use common::{ApiError, PaginatedResponse};
