//! Photo search client
//!
//! `SearchClient` issues exactly one GET per search and decodes the hits.
//! The network is reached through the [`Transport`] trait so the client can
//! be constructed once and handed a scripted transport in tests.

use crate::config::SearchConfig;
use crate::error::{SearchError, SearchResult};
use crate::query::build_search_url;
use crate::types::{ResultSet, SearchResponse};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Fetches the raw body behind a URL.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str) -> SearchResult<Vec<u8>>;
}

/// Transport backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> SearchResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                "photo-search/",
                env!("CARGO_PKG_VERSION"),
                " (Rust)"
            ))
            .gzip(true)
            .use_rustls_tls()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> SearchResult<Vec<u8>> {
        let response = self.client.get(url).send().await?;
        // Status is not checked; an error body fails to decode instead.
        log::debug!("Search endpoint answered with status {}", response.status());
        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

pub struct SearchClient<T: Transport = HttpTransport> {
    config: SearchConfig,
    endpoint: Url,
    transport: T,
}

impl SearchClient<HttpTransport> {
    /// Create a client talking to the real endpoint.
    pub fn from_config(config: SearchConfig) -> SearchResult<Self> {
        let transport = HttpTransport::new(config.timeout)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> SearchClient<T> {
    pub fn with_transport(config: SearchConfig, transport: T) -> SearchResult<Self> {
        let endpoint = config.validate()?;
        Ok(Self {
            config,
            endpoint,
            transport,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run one search for `query`.
    pub async fn search(&self, query: &str) -> SearchResult<ResultSet> {
        let url = build_search_url(&self.endpoint, &self.config, query);
        log::info!("Searching photos for '{}'", query);

        let body = self.transport.get(url.as_str()).await?;
        let response: SearchResponse = serde_json::from_slice(&body).map_err(|e| {
            log::debug!("Undecodable search body: {}", String::from_utf8_lossy(&body));
            SearchError::Decode(e)
        })?;

        let results: ResultSet = response.into();
        log::debug!("Search for '{}' returned {} photos", query, results.len());
        Ok(results)
    }
}
