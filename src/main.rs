//! Lekhashuddhi - curriculum-compliance audit for Marathi documents.
//!
//! A tool for checking Marathi `.docx` curriculum documents against a
//! fixed vocabulary, a spelling dictionary, and an external grammar
//! reviewer, producing one spreadsheet report per document.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lekhashuddhi::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "lekhashuddhi=info"
    } else {
        "lekhashuddhi=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    cli::run().await
}
