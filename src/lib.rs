pub mod cli;
pub mod client;
pub mod config;
pub mod controller;
pub mod core;
pub mod debouncer;
pub mod error;
pub mod presenter;
pub mod query;
pub mod types;

// 公開API
pub use client::{HttpTransport, SearchClient, Transport};
pub use config::SearchConfig;
pub use controller::SearchController;
pub use error::{SearchError, SearchResult};
pub use presenter::{GridPresenter, Presenter};
pub use types::{ResultSet, SearchRecord};
