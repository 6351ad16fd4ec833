use crate::models::{FilterSpec, MatchLink, UserProfile};
use crate::services::directory::{DirectoryError, MatchDirectory, UserDirectory};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Matching service REST client
///
/// Implements both directory traits against the backend:
/// - Current user and single user lookups
/// - Match links and their resolution (cached by href)
/// - Like/dislike verdict writes
/// - Filtered candidate queries
pub struct HttpMatchDirectory {
    base_url: String,
    auth_token: Option<String>,
    client: Client,
    link_cache: moka::future::Cache<String, UserProfile>,
}

/// Tuning for [`HttpMatchDirectory`]
#[derive(Debug, Clone)]
pub struct HttpDirectoryOptions {
    pub timeout: Duration,
    pub cache_capacity: u64,
    pub cache_ttl: Duration,
}

impl Default for HttpDirectoryOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            cache_capacity: 1000,
            cache_ttl: Duration::from_secs(300),
        }
    }
}

impl HttpMatchDirectory {
    /// Create a new client
    pub fn new(
        base_url: impl Into<String>,
        auth_token: Option<String>,
        options: HttpDirectoryOptions,
    ) -> Result<Self, DirectoryError> {
        let client = Client::builder().timeout(options.timeout).build()?;

        let link_cache = moka::future::CacheBuilder::new(options.cache_capacity)
            .time_to_live(options.cache_ttl)
            .build();

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth_token,
            client,
            link_cache,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Absolute URL for a link; relative hrefs are joined to the base URL
    fn link_url(&self, link: &MatchLink) -> Result<String, DirectoryError> {
        let href = link.href.trim();
        if href.is_empty() {
            return Err(DirectoryError::InvalidLink("empty href".into()));
        }
        if href.starts_with("http://") || href.starts_with("https://") {
            Ok(href.to_string())
        } else {
            Ok(self.url(href))
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn execute(&self, request: RequestBuilder, what: &str) -> Result<Response, DirectoryError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(DirectoryError::Unauthorized),
            StatusCode::NOT_FOUND => Err(DirectoryError::NotFound(what.to_string())),
            _ => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read body".to_string());
                tracing::error!("Failed to {}: {} - {}", what, status, body);
                Err(DirectoryError::Api(format!("Failed to {}: {}", what, status)))
            }
        }
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        what: &str,
    ) -> Result<T, DirectoryError> {
        let response = self.execute(request, what).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| DirectoryError::InvalidResponse(format!("Failed to {}: {}", what, e)))
    }

    async fn write(&self, request: RequestBuilder, what: &str) -> Result<(), DirectoryError> {
        self.execute(request, what).await?;
        tracing::debug!("Verdict write ok: {}", what);
        Ok(())
    }
}

#[async_trait]
impl UserDirectory for HttpMatchDirectory {
    async fn get_current_user(&self) -> Result<UserProfile, DirectoryError> {
        let url = self.url("users/current");
        tracing::debug!("Fetching current user from: {}", url);
        self.fetch_json(self.client.get(&url), "fetch current user").await
    }

    async fn get_user(&self, user_id: i64) -> Result<UserProfile, DirectoryError> {
        let url = self.url(&format!("users/{}", user_id));
        tracing::debug!("Fetching profile for user: {}", user_id);
        self.fetch_json(self.client.get(&url), &format!("fetch user {}", user_id))
            .await
    }
}

#[async_trait]
impl MatchDirectory for HttpMatchDirectory {
    async fn get_matching_drivers(&self, user_id: i64) -> Result<Vec<MatchLink>, DirectoryError> {
        let url = self.url(&format!("matches/{}", user_id));
        let links: Vec<MatchLink> = self
            .fetch_json(self.client.get(&url), &format!("fetch matches for {}", user_id))
            .await?;
        tracing::debug!("Fetched {} match links for user {}", links.len(), user_id);
        Ok(links)
    }

    async fn get_from_link(&self, link: &MatchLink) -> Result<UserProfile, DirectoryError> {
        let url = self.link_url(link)?;

        if let Some(profile) = self.link_cache.get(&url).await {
            tracing::trace!("Link cache hit: {}", url);
            return Ok(profile);
        }

        let profile: UserProfile = self
            .fetch_json(self.client.get(&url), &format!("resolve link {}", url))
            .await?;
        self.link_cache.insert(url, profile.clone()).await;
        Ok(profile)
    }

    async fn like_driver(&self, user_id: i64, other_id: i64) -> Result<(), DirectoryError> {
        let url = self.url(&format!("matches/{}/likes/{}", user_id, other_id));
        self.write(self.client.post(&url), &format!("like {} -> {}", user_id, other_id))
            .await
    }

    async fn unlike_driver(&self, user_id: i64, other_id: i64) -> Result<(), DirectoryError> {
        let url = self.url(&format!("matches/{}/likes/{}", user_id, other_id));
        self.write(self.client.delete(&url), &format!("unlike {} -> {}", user_id, other_id))
            .await
    }

    async fn dislike_driver(&self, user_id: i64, other_id: i64) -> Result<(), DirectoryError> {
        let url = self.url(&format!("matches/{}/dislikes/{}", user_id, other_id));
        self.write(self.client.post(&url), &format!("dislike {} -> {}", user_id, other_id))
            .await
    }

    async fn undislike_driver(&self, user_id: i64, other_id: i64) -> Result<(), DirectoryError> {
        let url = self.url(&format!("matches/{}/dislikes/{}", user_id, other_id));
        self.write(
            self.client.delete(&url),
            &format!("undislike {} -> {}", user_id, other_id),
        )
        .await
    }

    async fn get_filtered_drivers(
        &self,
        user_id: i64,
        filter: &FilterSpec,
    ) -> Result<Vec<UserProfile>, DirectoryError> {
        let url = self.url(&format!("matches/{}/filter", user_id));
        let profiles: Vec<UserProfile> = self
            .fetch_json(
                self.client.post(&url).json(filter),
                &format!("fetch filtered matches for {}", user_id),
            )
            .await?;
        tracing::debug!("Filter {:?} returned {} profiles", filter, profiles.len());
        Ok(profiles)
    }
}
