//! Error types for photo search operations

use crate::core::ActorSendError;
use thiserror::Error;

/// Boxed transport failure, so that non-reqwest transports can report errors too.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Input could not be turned into query text and no fallback term is configured
    #[error("query is not valid text: {0}")]
    Encoding(String),

    #[error("transport error: {0}")]
    Transport(#[source] TransportError),

    #[error("failed to decode search response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("search controller has shut down")]
    Closed(#[from] ActorSendError),
}

impl From<reqwest::Error> for SearchError {
    fn from(error: reqwest::Error) -> Self {
        SearchError::Transport(Box::new(error))
    }
}

pub type SearchResult<T> = Result<T, SearchError>;
