//
//  bitbucket-client
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types
//!
//! Error handling and response decoding shared by every resource façade.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all API operations
//! - [`decode`] - Turns a dynamic JSON response into a typed entity
//! - [`check_envelope`] - Rejects the service error envelope on pass-through responses
//! - Pagination types (re-exported from [`pagination`] submodule)
//!
//! # Error Envelope
//!
//! Bitbucket Cloud signals failure with a JSON body of the form:
//!
//! ```json
//! {"type": "error", "error": {"message": "Repository not found", "detail": "...", "fields": {}}}
//! ```
//!
//! The HTTP status code is not consulted. Any object whose `type` field is the
//! literal string `"error"` is an error, whatever entity was expected.
//!
//! # Example
//!
//! ```rust
//! use bitbucket_client::api::common::{decode, ApiError};
//! use bitbucket_client::api::cloud::Project;
//! use serde_json::json;
//!
//! let err = decode::<Project>(json!({"type": "error", "error": {"message": "nope"}})).unwrap_err();
//! assert!(matches!(err, ApiError::Service { .. }));
//! ```

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

mod pagination;

pub use pagination::*;

/// Unified error type for all Bitbucket API operations.
///
/// | Variant | Cause |
/// |---------|-------|
/// | `Network` | Connection failure or response body read failure |
/// | `InvalidUrl` | The request URL could not be parsed |
/// | `Service` | The response was the service error envelope |
/// | `Decode` | The response did not match the expected entity |
/// | `Shape` | A nested field an aggregate helper relies on is absent or mistyped |
/// | `Auth` | The OAuth token endpoint rejected the credentials |
/// | `Io` | A local file (upload source) could not be read |
///
/// # Example
///
/// ```rust
/// use bitbucket_client::api::common::ApiError;
///
/// fn describe(result: Result<(), ApiError>) -> String {
///     match result {
///         Ok(()) => "ok".to_string(),
///         Err(ApiError::Service { message, .. }) => format!("Bitbucket said: {}", message),
///         Err(e) => format!("failed: {}", e),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum ApiError {
    /// A network-level error occurred during the request.
    ///
    /// Covers connection failures, DNS resolution errors and failures
    /// reading the response body.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request URL was malformed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The service answered with its error envelope.
    #[error("Bitbucket error: {message}")]
    Service {
        /// Human readable message from `error.message`.
        message: String,
        /// Optional longer explanation from `error.detail`.
        detail: Option<String>,
        /// Per-field validation messages from `error.fields`.
        fields: HashMap<String, Vec<String>>,
    },

    /// The response could not be decoded into the expected type.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response did not have the shape an aggregate helper expects.
    #[error("Unexpected response shape: {0}")]
    Shape(String),

    /// Obtaining or refreshing an OAuth token failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A local file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Returns `true` for errors reported by the service through its error envelope.
    pub fn is_service_error(&self) -> bool {
        matches!(self, Self::Service { .. })
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    fields: HashMap<String, Vec<String>>,
}

/// Returns `true` when `value` is an object whose `type` field equals `"error"`.
pub fn is_error_envelope(value: &Value) -> bool {
    value.get("type").and_then(Value::as_str) == Some("error")
}

/// Builds an [`ApiError::Service`] from an error envelope.
///
/// The message is read from `error.message`, falling back to a top-level
/// `message` field. Unparseable `fields` entries are dropped rather than
/// masking the service message.
pub fn envelope_error(value: &Value) -> ApiError {
    let body = value
        .get("error")
        .cloned()
        .and_then(|e| serde_json::from_value::<ErrorBody>(e).ok())
        .unwrap_or_default();

    let message = body
        .message
        .or_else(|| {
            value
                .get("message")
                .and_then(Value::as_str)
                .map(String::from)
        })
        .unwrap_or_else(|| "unknown error".to_string());

    tracing::warn!("Bitbucket returned an error envelope: {}", message);

    ApiError::Service {
        message,
        detail: body.detail,
        fields: body.fields,
    }
}

/// Passes a dynamic response through unchanged unless it is the error envelope.
pub fn check_envelope(value: Value) -> Result<Value, ApiError> {
    if is_error_envelope(&value) {
        return Err(envelope_error(&value));
    }
    Ok(value)
}

/// Passes a raw response body through unless it parses as the error envelope.
///
/// File contents and diffs are not JSON, so a body that fails to parse is
/// returned unchanged.
pub fn check_raw_envelope(bytes: Vec<u8>) -> Result<Vec<u8>, ApiError> {
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(value) if is_error_envelope(&value) => Err(envelope_error(&value)),
        _ => Ok(bytes),
    }
}

/// Decodes a dynamic response into a typed entity.
///
/// The error envelope check runs first, so a response with `type: "error"`
/// always yields [`ApiError::Service`] regardless of `T`. Anything that is not
/// a JSON object yields [`ApiError::Shape`]; an object whose fields do not
/// match `T` yields [`ApiError::Decode`].
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    if !value.is_object() {
        return Err(ApiError::Shape(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    }
    let value = check_envelope(value)?;
    Ok(serde_json::from_value(value)?)
}

/// Short name of a JSON value's kind, for error messages.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
