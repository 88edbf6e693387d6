//
//  bitbucket-client
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Pagination Types for Bitbucket Cloud Responses
//!
//! Collection endpoints return one page at a time wrapped in an envelope with
//! `values` plus `next`/`previous` links. The page size is controlled with the
//! `pagelen` query parameter, which the client injects for `/repositories/`
//! endpoints when a non-default page length is configured.
//!
//! # Example
//!
//! ```rust
//! use bitbucket_client::api::common::PaginatedResponse;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Named {
//!     name: String,
//! }
//!
//! let json = r#"{
//!     "values": [{"name": "api"}],
//!     "page": 1,
//!     "pagelen": 10,
//!     "next": "https://api.bitbucket.org/2.0/teams/acme/repositories?page=2"
//! }"#;
//!
//! let page: PaginatedResponse<Named> = serde_json::from_str(json).unwrap();
//! assert_eq!(page.values[0].name, "api");
//! assert!(page.has_next());
//! ```

use serde::{Deserialize, Serialize};

/// A single page of results from a Bitbucket Cloud collection endpoint.
///
/// # Notes
///
/// - `size` is omitted by some endpoints for performance reasons
/// - Page numbers are 1-indexed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Items in the current page.
    pub values: Vec<T>,

    /// Current page number (1-indexed).
    #[serde(default)]
    pub page: Option<u32>,

    /// Number of items requested per page.
    #[serde(default)]
    pub pagelen: Option<u32>,

    /// Total number of items across all pages, when reported.
    #[serde(default)]
    pub size: Option<u32>,

    /// Absolute URL of the next page.
    #[serde(default)]
    pub next: Option<String>,

    /// Absolute URL of the previous page.
    #[serde(default)]
    pub previous: Option<String>,
}

impl<T> PaginatedResponse<T> {
    /// Returns `true` if a further page can be fetched.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    /// URL of the next page, if any.
    pub fn next_url(&self) -> Option<&str> {
        self.next.as_deref()
    }
}
