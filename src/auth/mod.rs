//
//  bitbucket-client
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Credentials and request signing for the Bitbucket Cloud API.
//!
//! ## Supported Authentication Methods
//!
//! - **OAuth 2.0 client credentials**: an OAuth consumer key and secret. The
//!   client exchanges them for an access token (see [`oauth`]) and signs
//!   requests with `Authorization: Bearer <token>`.
//! - **Basic Authentication**: username and password (or app password),
//!   sent as `Authorization: Basic ...`.
//!
//! ## Signing Rules
//!
//! [`Auth::sign`] applies exactly one of:
//!
//! 1. HTTP Basic auth, if the credentials are Basic with a non-empty username and password
//! 2. A bearer token, if a valid (unexpired) [`OAuthToken`] is held
//! 3. Nothing; the request goes out unauthenticated
//!
//! ## Example
//!
//! ```rust
//! use bitbucket_client::auth::{Auth, Credentials};
//!
//! let auth = Auth::new(Credentials::basic("jdoe", "app-password"));
//! assert!(auth.credentials().is_basic());
//! ```

pub mod oauth;

pub use oauth::*;

use chrono::{DateTime, Duration, Utc};
use reqwest::RequestBuilder;

/// Seconds before `expires_at` at which a token is already treated as expired.
const EXPIRY_DELTA_SECS: i64 = 10;

/// Credentials a client authenticates with.
///
/// Exactly one variant is held per client. Values are immutable once the
/// client is built.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// OAuth 2.0 consumer credentials.
    OAuth {
        /// The OAuth consumer key.
        client_id: String,
        /// The OAuth consumer secret.
        secret: String,
    },
    /// HTTP Basic authentication.
    Basic {
        /// The Bitbucket username.
        username: String,
        /// The password or app password.
        password: String,
    },
}

impl Credentials {
    /// OAuth consumer credentials.
    pub fn oauth(client_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::OAuth {
            client_id: client_id.into(),
            secret: secret.into(),
        }
    }

    /// Username and password credentials.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns `true` for [`Credentials::Basic`].
    pub fn is_basic(&self) -> bool {
        matches!(self, Self::Basic { .. })
    }

    /// Returns `true` for [`Credentials::OAuth`].
    pub fn is_oauth(&self) -> bool {
        matches!(self, Self::OAuth { .. })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OAuth { client_id, .. } => f
                .debug_struct("OAuth")
                .field("client_id", client_id)
                .field("secret", &"***")
                .finish(),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}

/// An OAuth 2.0 access token.
///
/// Obtained from the token endpoint by [`client_credentials_token`] or
/// supplied by the caller.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuthToken {
    /// The bearer token sent with each request.
    pub access_token: String,
    /// Token type reported by the provider, normally `bearer`.
    pub token_type: String,
    /// Refresh token, if the grant issued one.
    pub refresh_token: Option<String>,
    /// Expiry instant. `None` means the token does not expire.
    pub expires_at: Option<DateTime<Utc>>,
    /// Scopes granted to the token.
    pub scopes: Vec<String>,
}

impl OAuthToken {
    /// A non-expiring bearer token.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "bearer".to_string(),
            refresh_token: None,
            expires_at: None,
            scopes: Vec::new(),
        }
    }

    /// Sets the expiry instant.
    pub fn expiring_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Returns `true` if the token has expired.
    ///
    /// A token counts as expired ten seconds before `expires_at`, so it is
    /// not sent in a request that would arrive after the deadline.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(exp) => exp - Duration::seconds(EXPIRY_DELTA_SECS) <= Utc::now(),
            None => false,
        }
    }

    /// Returns `true` if the token is non-empty and unexpired.
    pub fn is_valid(&self) -> bool {
        !self.access_token.is_empty() && !self.is_expired()
    }

    /// Adds the `Authorization: Bearer` header to a request.
    pub fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(&self.access_token)
    }
}

impl std::fmt::Debug for OAuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthToken")
            .field("access_token", &"***")
            .field("token_type", &self.token_type)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expires_at", &self.expires_at)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// The signing strategy of a client: its credentials plus any token obtained for them.
#[derive(Debug, Clone)]
pub struct Auth {
    credentials: Credentials,
    token: Option<OAuthToken>,
}

impl Auth {
    /// Creates a signer with no token yet.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            token: None,
        }
    }

    /// Attaches an OAuth token.
    pub fn with_token(mut self, token: OAuthToken) -> Self {
        self.token = Some(token);
        self
    }

    /// The configured credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The current OAuth token, if one has been obtained.
    pub fn token(&self) -> Option<&OAuthToken> {
        self.token.as_ref()
    }

    /// Applies exactly one authentication scheme to an outgoing request.
    ///
    /// Basic auth wins when both username and password are non-empty. A
    /// bearer header is added only for a valid token. Otherwise the request
    /// is returned untouched.
    pub fn sign(&self, request: RequestBuilder) -> RequestBuilder {
        if let Credentials::Basic { username, password } = &self.credentials {
            if !username.is_empty() && !password.is_empty() {
                return request.basic_auth(username, Some(password));
            }
        }

        match &self.token {
            Some(token) if token.is_valid() => token.apply_to_request(request),
            Some(_) => {
                tracing::debug!("OAuth token expired; sending request unauthenticated");
                request
            }
            None => request,
        }
    }
}
