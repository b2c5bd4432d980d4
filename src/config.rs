//! Search configuration
//!
//! Everything except the API key has a default matching the public
//! photo search service.

use crate::error::{SearchError, SearchResult};
use std::time::Duration;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://pixabay.com/api/";
pub const DEFAULT_PER_PAGE: u32 = 200;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub api_key: String,
    pub endpoint: String,
    pub per_page: u32,
    pub safe_search: bool,
    /// Quiescence window before typed text is considered settled
    pub debounce: Duration,
    /// Per-request timeout of the HTTP transport
    pub timeout: Duration,
    /// Substituted for input that is not valid text. `None` rejects such input.
    pub fallback_term: Option<String>,
}

impl SearchConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            per_page: DEFAULT_PER_PAGE,
            safe_search: true,
            debounce: DEFAULT_DEBOUNCE,
            timeout: DEFAULT_TIMEOUT,
            fallback_term: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_fallback_term(mut self, term: impl Into<String>) -> Self {
        self.fallback_term = Some(term.into());
        self
    }

    /// Check the settings that cannot be defaulted and return the parsed endpoint.
    pub fn validate(&self) -> SearchResult<Url> {
        if self.api_key.trim().is_empty() {
            return Err(SearchError::Config("API key must not be empty".to_string()));
        }
        self.endpoint_url()
    }

    /// Parse the endpoint. Query parameters are added per search, so the
    /// endpoint itself must carry neither a query nor a fragment.
    pub fn endpoint_url(&self) -> SearchResult<Url> {
        let invalid = |reason: &str| {
            SearchError::Config(format!("invalid endpoint {:?}: {}", self.endpoint, reason))
        };

        let url = Url::parse(&self.endpoint).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(invalid("missing host"));
        }
        if url.query().is_some() {
            return Err(invalid("must not carry a query string"));
        }
        if url.fragment().is_some() {
            return Err(invalid("must not carry a fragment"));
        }
        Ok(url)
    }
}
