//! Command line front end
//!
//! Each stdin line stands in for the search bar's current text, so typing
//! (or piping) lines quickly exercises the same debounce path as keystrokes.
//! Results are printed as a text grid.

use crate::client::SearchClient;
use crate::config::{SearchConfig, DEFAULT_ENDPOINT, DEFAULT_PER_PAGE};
use crate::controller::SearchController;
use crate::presenter::GridPresenter;
use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

/// photo-search - debounced photo search from the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// API key of the search service
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Search endpoint
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Results requested per search
    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    pub per_page: u32,

    /// Quiet period in milliseconds before typed text is searched
    #[arg(long, default_value_t = 1000)]
    pub debounce_ms: u64,

    /// HTTP request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Term searched instead of input that is not valid UTF-8 (rejected when unset)
    #[arg(long)]
    pub fallback_term: Option<String>,

    /// Grid columns
    #[arg(long, default_value_t = 3)]
    pub columns: usize,
}

impl Cli {
    pub fn to_config(&self) -> SearchConfig {
        let mut config = SearchConfig::new(self.api_key.clone())
            .with_endpoint(self.endpoint.clone())
            .with_debounce(Duration::from_millis(self.debounce_ms));
        config.per_page = self.per_page;
        config.timeout = Duration::from_secs(self.timeout_secs);
        config.fallback_term = self.fallback_term.clone();
        config
    }
}

/// CLI実行エントリーポイント
pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.to_config();
    log::debug!(
        "Configuration: endpoint={} per_page={} debounce={:?}",
        config.endpoint,
        config.per_page,
        config.debounce
    );

    let debounce = config.debounce;
    let timeout = config.timeout;
    let client =
        SearchClient::from_config(config).context("failed to set up the search client")?;
    let controller = SearchController::spawn(
        Arc::new(client),
        GridPresenter::new(std::io::stdout(), cli.columns),
    );

    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut line = Vec::new();
    loop {
        line.clear();
        let read = stdin
            .read_until(b'\n', &mut line)
            .await
            .context("failed to read stdin")?;
        if read == 0 {
            break;
        }
        while matches!(line.last(), Some(b'\n' | b'\r')) {
            line.pop();
        }
        if let Err(e) = controller.on_input(&line) {
            log::warn!("Ignoring input: {}", e);
        }
    }

    // Let the last input settle and its search finish before exiting
    let grace = debounce + timeout;
    if tokio::time::timeout(grace, controller.wait_until_idle()).await.is_err() {
        log::debug!("Search still running {:?} after end of input", grace);
    }

    controller.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["photo-search", "--api-key", "secret"]).unwrap();
        let config = cli.to_config();
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.endpoint, "https://pixabay.com/api/");
        assert_eq!(config.per_page, 200);
        assert_eq!(config.debounce, Duration::from_secs(1));
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.fallback_term.is_none());
        assert_eq!(cli.columns, 3);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "photo-search",
            "--api-key",
            "secret",
            "--debounce-ms",
            "250",
            "--fallback-term",
            "opal",
        ])
        .unwrap();
        let config = cli.to_config();
        assert_eq!(config.debounce, Duration::from_millis(250));
        assert_eq!(config.fallback_term.as_deref(), Some("opal"));
    }
}
