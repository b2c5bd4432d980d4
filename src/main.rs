//! photo-search - debounced photo search
//!
//! Command-line usage:
//!   API_KEY=... photo-search [--debounce-ms N] [--columns N]
//!
//! Every line read from stdin replaces the search text; results of the
//! latest search are printed as a grid.

use photo_search::cli::run_cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init();

    run_cli().await
}
