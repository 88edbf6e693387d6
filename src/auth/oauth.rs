//
//  bitbucket-client
//  auth/oauth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # OAuth 2.0 Token Exchange
//!
//! Token endpoint calls for OAuth consumers:
//!
//! - **Client credentials grant**: trade a consumer key and secret for an
//!   access token ([`client_credentials_token`]).
//! - **Refresh grant**: trade a refresh token for a new access token
//!   ([`refresh_token`]).
//!
//! Both authenticate the consumer with HTTP Basic auth and send a
//! `application/x-www-form-urlencoded` body, as Bitbucket requires.
//!
//! ## Example
//!
//! ```rust,no_run
//! use bitbucket_client::auth::client_credentials_token;
//! use bitbucket_client::config::DEFAULT_TOKEN_URL;
//!
//! # async fn example() -> Result<(), bitbucket_client::ApiError> {
//! let http = reqwest::Client::new();
//! let token = client_credentials_token(&http, DEFAULT_TOKEN_URL, "key", "secret").await?;
//! println!("token valid: {}", token.is_valid());
//! # Ok(())
//! # }
//! ```

use chrono::{Duration, Utc};
use reqwest::Client;
use serde::Deserialize;

use super::OAuthToken;
use crate::api::common::ApiError;

/// Raw token endpoint response.
#[derive(Deserialize)]
struct TokenResponseRaw {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    scopes: Option<String>,
}

impl From<TokenResponseRaw> for OAuthToken {
    fn from(raw: TokenResponseRaw) -> Self {
        let scopes = raw
            .scopes
            .map(|s| s.split_whitespace().map(String::from).collect())
            .unwrap_or_default();

        Self {
            access_token: raw.access_token,
            token_type: raw.token_type.unwrap_or_else(|| "bearer".to_string()),
            refresh_token: raw.refresh_token,
            expires_at: raw.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)),
            scopes,
        }
    }
}

/// Performs the OAuth 2.0 client credentials grant.
///
/// # Errors
///
/// - [`ApiError::Network`] if the token endpoint cannot be reached
/// - [`ApiError::Auth`] if the endpoint rejects the consumer
/// - [`ApiError::Decode`] if the response is not a token document
pub async fn client_credentials_token(
    http: &Client,
    token_url: &str,
    client_id: &str,
    secret: &str,
) -> Result<OAuthToken, ApiError> {
    request_token(
        http,
        token_url,
        client_id,
        secret,
        &[("grant_type", "client_credentials")],
    )
    .await
}

/// Exchanges a refresh token for a new access token.
///
/// The returned token keeps the old refresh token when the endpoint does not
/// issue a new one.
pub async fn refresh_token(
    http: &Client,
    token_url: &str,
    client_id: &str,
    secret: &str,
    refresh_token: &str,
) -> Result<OAuthToken, ApiError> {
    let mut token = request_token(
        http,
        token_url,
        client_id,
        secret,
        &[("grant_type", "refresh_token"), ("refresh_token", refresh_token)],
    )
    .await?;

    if token.refresh_token.is_none() {
        token.refresh_token = Some(refresh_token.to_string());
    }
    Ok(token)
}

async fn request_token(
    http: &Client,
    token_url: &str,
    client_id: &str,
    secret: &str,
    params: &[(&str, &str)],
) -> Result<OAuthToken, ApiError> {
    tracing::debug!("Requesting OAuth token from {}", token_url);

    let response = http
        .post(token_url)
        .basic_auth(client_id, Some(secret))
        .form(params)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(ApiError::Auth(format!(
            "Token exchange failed ({}): {}",
            status, body
        )));
    }

    let raw: TokenResponseRaw = serde_json::from_str(&body)?;
    Ok(raw.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_response_conversion() {
        let raw: TokenResponseRaw = serde_json::from_str(
            r#"{"access_token": "abc", "token_type": "bearer", "expires_in": 7200, "scopes": "repository pipeline"}"#,
        )
        .unwrap();
        let token: OAuthToken = raw.into();

        assert_eq!(token.access_token, "abc");
        assert_eq!(token.scopes, vec!["repository", "pipeline"]);
        assert!(token.is_valid());
        assert!(token.expires_at.is_some());
    }

    #[test]
    fn test_token_response_without_expiry() {
        let raw: TokenResponseRaw = serde_json::from_str(r#"{"access_token": "abc"}"#).unwrap();
        let token: OAuthToken = raw.into();
        assert_eq!(token.token_type, "bearer");
        assert_eq!(token.expires_at, None);
    }
}
