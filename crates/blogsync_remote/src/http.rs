//! HTTP remote source implementation.
//!
//! This module provides an HTTP-based remote source for the blog API.
//! The actual HTTP client is abstracted via a trait so the request, retry
//! and decoding logic can be exercised without a network.

use crate::config::{RemoteConfig, RetryConfig};
use crate::error::{NetworkError, NetworkResult};
use crate::source::RemoteSource;
use async_trait::async_trait;
use blogsync_model::{Comment, Post, User};
use parking_lot::RwLock;
use reqwest::Url;
use serde::de::DeserializeOwned;

/// A raw HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual HTTP transport.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends a GET request and returns the status and body.
    async fn get(&self, url: &Url) -> NetworkResult<HttpResponse>;
}

/// Reqwest-backed HTTP client.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Builds a client with the configured timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: &RemoteConfig) -> NetworkResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| NetworkError::transport_fatal(format!("cannot build client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &Url) -> NetworkResult<HttpResponse> {
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}

/// HTTP-based remote source.
///
/// Uses JSON bodies and JSONPlaceholder-style endpoints:
/// `users`, `comments` and `posts?_page=&_limit=` relative to the base URL.
/// Retryable failures are retried with backoff per [`RetryConfig`].
pub struct HttpRemoteSource<C: HttpClient = ReqwestClient> {
    /// Base URL of the API, always ending with `/`.
    base_url: Url,
    /// HTTP client implementation.
    client: C,
    /// Retry policy.
    retry: RetryConfig,
    /// Last error message.
    last_error: RwLock<Option<String>>,
}

impl HttpRemoteSource<ReqwestClient> {
    /// Creates a reqwest-backed source from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the client cannot be
    /// built.
    pub fn from_config(config: &RemoteConfig) -> NetworkResult<Self> {
        let client = ReqwestClient::new(config)?;
        Self::new(&config.base_url, config.retry.clone(), client)
    }
}

impl<C: HttpClient> HttpRemoteSource<C> {
    /// Creates a new HTTP remote source.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn new(base_url: &str, retry: RetryConfig, client: C) -> NetworkResult<Self> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| NetworkError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            client,
            retry,
            last_error: RwLock::new(None),
        })
    }

    /// Returns the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the last error message.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    /// Builds the URL of a collection endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint cannot be joined to the base URL.
    pub fn endpoint(&self, path: &str) -> NetworkResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| NetworkError::InvalidUrl(format!("{path}: {e}")))
    }

    /// Builds the URL of one page of posts.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint cannot be joined to the base URL.
    pub fn posts_endpoint(&self, page: u32, limit: u32) -> NetworkResult<Url> {
        let mut url = self.endpoint("posts")?;
        url.query_pairs_mut()
            .append_pair("_page", &page.to_string())
            .append_pair("_limit", &limit.to_string());
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> NetworkResult<T> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            if attempt > 0 {
                let delay = self.retry.delay_for_attempt(attempt);
                tokio::time::sleep(delay).await;
            }

            match self.get_once(&url).await {
                Ok(value) => {
                    *self.last_error.write() = None;
                    return Ok(value);
                }
                Err(e) => {
                    *self.last_error.write() = Some(e.to_string());
                    if e.is_retryable() && attempt + 1 < max_attempts {
                        tracing::warn!(%url, attempt, error = %e, "remote fetch failed, retrying");
                        attempt += 1;
                        continue;
                    }
                    return Err(e);
                }
            }
        }
    }

    async fn get_once<T: DeserializeOwned>(&self, url: &Url) -> NetworkResult<T> {
        let response = self.client.get(url).await?;
        if !(200..300).contains(&response.status) {
            return Err(NetworkError::Status {
                status: response.status,
            });
        }
        serde_json::from_slice(&response.body)
            .map_err(|e| NetworkError::Decode(format!("{url}: {e}")))
    }
}

#[async_trait]
impl<C: HttpClient> RemoteSource for HttpRemoteSource<C> {
    async fn fetch_users(&self) -> NetworkResult<Vec<User>> {
        let url = self.endpoint("users")?;
        self.get_json(url).await
    }

    async fn fetch_comments(&self) -> NetworkResult<Vec<Comment>> {
        let url = self.endpoint("comments")?;
        self.get_json(url).await
    }

    async fn fetch_posts(&self, page: u32, limit: u32) -> NetworkResult<Vec<Post>> {
        let url = self.posts_endpoint(page, limit)?;
        self.get_json(url).await
    }
}
