//! HTTP transport for the FPL JSON API
//!
//! [`Transport`] is the seam between the aggregation engine and the network:
//! one call issues one request and returns the raw body. Decoding is kept in
//! [`fetch_json`] so every transport gets the same error classification.

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::cookie::Jar;
use serde::de::DeserializeOwned;
use serde_json::error::Category;
use std::sync::Arc;
use tracing::debug;
use url::Url;

/// Issues a single GET and returns the response body
///
/// Implementations must be safe to share across concurrent fan-out tasks.
/// No retries: the first failure is final for that call.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetch `target` (a path relative to the API base) and return its body
    async fn get(&self, target: &str) -> Result<String>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn get(&self, target: &str) -> Result<String> {
        (**self).get(target).await
    }
}

/// Fetch `target` and decode the body as `T`
///
/// A body that is not JSON becomes [`Error::Decode`], which the API produces
/// while the game is being updated. JSON of the wrong shape for `T` becomes
/// [`Error::Schema`].
pub async fn fetch_json<T, Tr>(transport: &Tr, target: &str) -> Result<T>
where
    T: DeserializeOwned,
    Tr: Transport + ?Sized,
{
    let body = transport.get(target).await?;
    decode(target, &body)
}

/// Decode a response body
///
/// Syntax errors and truncated bodies are [`Error::Decode`]; valid JSON with
/// missing or mistyped fields is [`Error::Schema`].
pub fn decode<T: DeserializeOwned>(target: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        let target = target.to_string();
        let reason = e.to_string();
        match e.classify() {
            Category::Data => Error::Schema { target, reason },
            Category::Syntax | Category::Eof | Category::Io => Error::Decode { target, reason },
        }
    })
}

/// [`Transport`] over a `reqwest` client
///
/// Cloning is cheap and clones share the same connection pool and cookie jar.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create an unauthenticated transport
    ///
    /// # Errors
    /// Returns error if the base URL is invalid or the HTTP client cannot be created
    pub fn anonymous(config: &ApiConfig) -> Result<Self> {
        let client = build_client(config, None)?;
        Self::with_client(client, &config.base_url)
    }

    /// Create a transport around an existing client (used by [`crate::session::Session`])
    pub(crate) fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self> {
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Base URL relative targets are joined onto
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a target against the base URL
    ///
    /// Absolute URLs are used as-is, so authenticated endpoints on another
    /// host can go through the same transport.
    pub fn resolve(&self, target: &str) -> Result<Url> {
        self.base_url.join(target).map_err(|e| Error::Config {
            message: format!("invalid request target '{target}': {e}"),
            key: None,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, target: &str) -> Result<String> {
        let url = self.resolve(target)?;
        debug!(%url, "GET");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| Error::Transport {
                target: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                target: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| Error::Transport {
            target: url.to_string(),
            source,
        })
    }
}

/// Build the shared HTTP client, optionally backed by a cookie jar
pub(crate) fn build_client(
    config: &ApiConfig,
    cookie_jar: Option<Arc<Jar>>,
) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.as_str());
    if let Some(jar) = cookie_jar {
        builder = builder.cookie_provider(jar);
    }
    builder
        .build()
        .map_err(|e| Error::Config {
            message: format!("failed to create HTTP client: {e}"),
            key: None,
        })
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    // Url::join drops the last path segment unless the base ends in '/'
    let normalized = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };
    Url::parse(&normalized)
        .map_err(|e| Error::config(format!("invalid URL '{base_url}': {e}"), "api.base_url"))
}
