//
//  bitbucket-client
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Client for the Bitbucket Cloud API
//!
//! The [`Client`] owns the configuration, the authentication strategy and a
//! pooled `reqwest` client. Every resource façade goes through two
//! primitives defined here:
//!
//! - [`Client::execute`]: one round trip, JSON response parsed into a [`Value`]
//! - [`Client::execute_raw`]: one round trip, response bytes returned as-is
//!
//! URLs are built with [`Client::request_url`] from a path template and
//! positional arguments.
//!
//! ## Pagination
//!
//! When the configured page length differs from the API default of 10, any
//! request whose path contains `/repositories/` gets a `pagelen` query
//! parameter set to the configured value, replacing one already present.
//!
//! ## Errors
//!
//! The HTTP status code is not inspected. Bitbucket reports failures through
//! its error envelope, which the façades check when decoding.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Response};
use serde_json::Value;
use url::Url;

use crate::api::cloud::{
    BranchRestrictionsApi, CommitsApi, DiffApi, PullRequestsApi, RepositoriesApi, RepositoryApi,
    TeamsApi, UserApi, UsersApi, WebhooksApi,
};
use crate::api::common::ApiError;
use crate::auth::{self, Auth, Credentials, OAuthToken};
use crate::config::{normalize_base_url, ClientConfig, DEFAULT_PAGE_LENGTH};

/// Path segment identifying the repositories collection.
const REPOSITORIES_SEGMENT: &str = "/repositories/";

/// The Bitbucket Cloud API client.
///
/// Configuration is fixed once the client is built. The builder-style
/// methods consume the client and return a new one, so a client shared
/// across tasks never changes underneath an in-flight request.
///
/// # Example
///
/// ```rust,no_run
/// use bitbucket_client::{Client, Credentials};
///
/// # async fn example() -> Result<(), bitbucket_client::ApiError> {
/// let client = Client::new(Credentials::basic("jdoe", "app-password"))?
///     .with_page_length(50);
///
/// let repos = client.teams().repositories("acme").await?;
/// println!("{}", repos);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    /// The underlying HTTP client
    http: reqwest::Client,
    /// Base URL, page length and token endpoint
    config: ClientConfig,
    /// Credentials and any OAuth token obtained for them
    auth: Auth,
}

impl Client {
    /// Creates a client using [`ClientConfig::from_env`].
    pub fn new(credentials: Credentials) -> Result<Self, ApiError> {
        Self::from_config(ClientConfig::from_env(), credentials)
    }

    /// Creates a client authenticating with HTTP Basic auth.
    pub fn with_basic_auth(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ApiError> {
        Self::new(Credentials::basic(username, password))
    }

    /// Creates a client for an OAuth consumer.
    ///
    /// Requests are unauthenticated until a token is attached with
    /// [`Client::with_token`] or obtained with [`Client::authenticate`].
    pub fn with_oauth(
        client_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, ApiError> {
        Self::new(Credentials::oauth(client_id, secret))
    }

    /// Creates a client from an explicit configuration.
    ///
    /// The base URL is normalized the same way as in [`Client::with_base_url`].
    pub fn from_config(mut config: ClientConfig, credentials: Credentials) -> Result<Self, ApiError> {
        config.base_url = normalize_base_url(&config.base_url);
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            config,
            auth: Auth::new(credentials),
        })
    }

    /// Returns a client that requests `page_length` items per page.
    pub fn with_page_length(mut self, page_length: u64) -> Self {
        self.config.page_length = page_length;
        self
    }

    /// Returns a client targeting a different API root.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = normalize_base_url(base_url);
        self
    }

    /// Returns a client signing requests with `token`.
    pub fn with_token(mut self, token: OAuthToken) -> Self {
        self.auth = self.auth.with_token(token);
        self
    }

    /// Obtains an access token for OAuth credentials.
    ///
    /// Uses the client credentials grant against the configured token
    /// endpoint. Basic-auth clients are returned unchanged.
    pub async fn authenticate(self) -> Result<Self, ApiError> {
        let token = match self.auth.credentials() {
            Credentials::OAuth { client_id, secret } => {
                auth::client_credentials_token(&self.http, &self.config.token_url, client_id, secret)
                    .await?
            }
            Credentials::Basic { .. } => return Ok(self),
        };
        Ok(self.with_token(token))
    }

    /// Refreshes the held OAuth token.
    ///
    /// Falls back to a fresh client credentials grant when the token has no
    /// refresh token, or when no token is held yet.
    pub async fn refresh(self) -> Result<Self, ApiError> {
        let (client_id, secret) = match self.auth.credentials() {
            Credentials::OAuth { client_id, secret } => (client_id.clone(), secret.clone()),
            Credentials::Basic { .. } => return Ok(self),
        };
        let Some(refresh) = self.auth.token().and_then(|t| t.refresh_token.clone()) else {
            return self.authenticate().await;
        };

        let token = auth::refresh_token(
            &self.http,
            &self.config.token_url,
            &client_id,
            &secret,
            &refresh,
        )
        .await?;
        Ok(self.with_token(token))
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The authentication strategy.
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// The API root.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// The configured page length.
    pub fn page_length(&self) -> u64 {
        self.config.page_length
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Builds an absolute URL from a path template.
    ///
    /// `%s`, `%d` and `%v` placeholders are replaced by `args` in order, and
    /// `%%` yields a literal `%`. A single empty argument means the template
    /// has no placeholders and is appended verbatim. Arguments are inserted
    /// without escaping.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bitbucket_client::{Client, Credentials};
    ///
    /// let client = Client::new(Credentials::basic("u", "p"))
    ///     .unwrap()
    ///     .with_base_url("https://api.example.com/2.0");
    /// assert_eq!(
    ///     client.request_url("/teams/%s/", &["acme"]),
    ///     "https://api.example.com/2.0/teams/acme/"
    /// );
    /// ```
    pub fn request_url(&self, template: &str, args: &[&str]) -> String {
        if args.len() == 1 && args[0].is_empty() {
            return format!("{}{}", self.config.base_url, template);
        }
        format!("{}{}", self.config.base_url, format_template(template, args))
    }

    /// Performs one request and parses the response as JSON.
    ///
    /// A `Some` non-empty body is sent with `Content-Type: application/json`.
    /// An empty response body yields [`Value::Null`].
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidUrl`] if `url` cannot be parsed
    /// - [`ApiError::Network`] on connection or body read failure
    /// - [`ApiError::Decode`] if a non-empty body is not JSON
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
    ) -> Result<Value, ApiError> {
        let response = self.send(method, url, body).await?;
        let bytes = response.bytes().await?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Performs one request and returns the response body unparsed.
    pub async fn execute_raw(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
    ) -> Result<Vec<u8>, ApiError> {
        let response = self.send(method, url, body).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
    ) -> Result<Response, ApiError> {
        let url = apply_page_length(url, self.config.page_length)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self.http.request(method.clone(), url.as_str());
        if let Some(body) = body.filter(|b| !b.is_empty()) {
            request = request.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = self.auth.sign(request).send().await?;
        tracing::debug!("{} {} -> {}", method, url, response.status());
        Ok(response)
    }

    /// Repository collection endpoints.
    pub fn repositories(&self) -> RepositoriesApi<'_> {
        RepositoriesApi::new(self)
    }

    /// Single repository endpoints.
    pub fn repository(&self) -> RepositoryApi<'_> {
        RepositoryApi::new(self)
    }

    /// Pull request endpoints.
    pub fn pull_requests(&self) -> PullRequestsApi<'_> {
        PullRequestsApi::new(self)
    }

    /// Commit endpoints.
    pub fn commits(&self) -> CommitsApi<'_> {
        CommitsApi::new(self)
    }

    /// Diff and patch endpoints.
    pub fn diff(&self) -> DiffApi<'_> {
        DiffApi::new(self)
    }

    /// Branch restriction endpoints.
    pub fn branch_restrictions(&self) -> BranchRestrictionsApi<'_> {
        BranchRestrictionsApi::new(self)
    }

    /// Webhook endpoints.
    pub fn webhooks(&self) -> WebhooksApi<'_> {
        WebhooksApi::new(self)
    }

    /// Team endpoints.
    pub fn teams(&self) -> TeamsApi<'_> {
        TeamsApi::new(self)
    }

    /// Endpoints for other users.
    pub fn users(&self) -> UsersApi<'_> {
        UsersApi::new(self)
    }

    /// Endpoints for the authenticated user.
    pub fn user(&self) -> UserApi<'_> {
        UserApi::new(self)
    }
}

/// Substitutes positional arguments into `%s`/`%d`/`%v` placeholders.
///
/// Placeholders without a matching argument are left in place.
pub fn format_template(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len() + args.iter().map(|a| a.len()).sum::<usize>());
    let mut args = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some('s' | 'd' | 'v') => match args.next() {
                Some(arg) => {
                    chars.next();
                    out.push_str(arg);
                }
                None => out.push('%'),
            },
            _ => out.push('%'),
        }
    }
    out
}

/// Parses `url` and sets `pagelen` for repositories-collection paths.
///
/// The parameter is only touched when `page_length` differs from
/// [`DEFAULT_PAGE_LENGTH`]; an existing `pagelen` is overwritten.
pub fn apply_page_length(url: &str, page_length: u64) -> Result<Url, ApiError> {
    let mut parsed = Url::parse(url)?;

    if page_length != DEFAULT_PAGE_LENGTH && parsed.path().contains(REPOSITORIES_SEGMENT) {
        let kept: Vec<(String, String)> = parsed
            .query_pairs()
            .filter(|(key, _)| key != "pagelen")
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        parsed
            .query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair("pagelen", &page_length.to_string());

        tracing::debug!("Injected pagelen={} into {}", page_length, parsed);
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Client {
        Client::from_config(ClientConfig::default(), Credentials::basic("u", "p"))
            .unwrap()
            .with_base_url("https://api.example.com/2.0")
    }

    #[test]
    fn test_request_url_substitutes_args() {
        assert_eq!(
            client().request_url("/teams/%s/", &["acme"]),
            "https://api.example.com/2.0/teams/acme/"
        );
        assert_eq!(
            client().request_url("/repositories/%s/%s/pullrequests/%d", &["o", "r", "7"]),
            "https://api.example.com/2.0/repositories/o/r/pullrequests/7"
        );
    }

    #[test]
    fn test_request_url_single_empty_arg_is_verbatim() {
        assert_eq!(
            client().request_url("/repositories/", &[""]),
            "https://api.example.com/2.0/repositories/"
        );
        // A placeholder stays when the lone argument is empty.
        assert_eq!(
            client().request_url("/teams/?role=%s", &[""]),
            "https://api.example.com/2.0/teams/?role=%s"
        );
    }

    #[test]
    fn test_format_template_edge_cases() {
        assert_eq!(format_template("100%% of %s", &["x"]), "100% of x");
        assert_eq!(format_template("/a/%s/%s", &["1"]), "/a/1/%s");
        assert_eq!(format_template("/a/%q", &["1"]), "/a/%q");
        assert_eq!(format_template("/a/%", &[]), "/a/%");
    }

    #[test]
    fn test_page_length_default_is_not_injected() {
        let url = apply_page_length("https://api.example.com/2.0/repositories/acme", 10).unwrap();
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_page_length_injected_for_repositories() {
        let url =
            apply_page_length("https://api.example.com/2.0/repositories/acme?role=member", 50)
                .unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("role".to_string(), "member".to_string()),
                ("pagelen".to_string(), "50".to_string())
            ]
        );
    }

    #[test]
    fn test_page_length_overwrites_existing() {
        let url = apply_page_length(
            "https://api.example.com/2.0/repositories/acme?pagelen=5&page=2",
            25,
        )
        .unwrap();
        let pagelens: Vec<String> = url
            .query_pairs()
            .filter(|(k, _)| k == "pagelen")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(pagelens, vec!["25".to_string()]);
        assert!(url.query_pairs().any(|(k, v)| k == "page" && v == "2"));
    }

    #[test]
    fn test_page_length_ignored_outside_repositories() {
        let url = apply_page_length("https://api.example.com/2.0/teams/acme/members", 50).unwrap();
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_malformed_url() {
        let err = apply_page_length("not a url", 10).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_from_config_normalizes_base_url() {
        let config = ClientConfig {
            base_url: "https://api.example.com/2.0/".to_string(),
            ..ClientConfig::default()
        };
        let client = Client::from_config(config, Credentials::basic("u", "p")).unwrap();
        assert_eq!(client.base_url(), "https://api.example.com/2.0");
        assert_eq!(
            client.request_url("/repositories/%s", &["acme"]),
            "https://api.example.com/2.0/repositories/acme"
        );
    }

    #[test]
    fn test_builders_keep_credentials() {
        let client = client().with_page_length(30);
        assert_eq!(client.page_length(), 30);
        assert!(client.auth().credentials().is_basic());
    }

    #[test]
    fn test_authenticate_is_noop_for_basic() {
        let client = tokio_test::block_on(client().authenticate()).unwrap();
        assert!(client.auth().token().is_none());
    }
}
