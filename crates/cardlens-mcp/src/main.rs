//! cardlens-mcp: MCP stdio server for card benefit lookups.

use anyhow::{Context, Result};
use cardlens::browser::chromium::{ChromiumBrowser, ChromiumConfig};
use cardlens::{RenderOptions, ScrapePipeline};
use cardlens_mcp::catalog::CardCatalog;
use cardlens_mcp::server::CardLensServer;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// MCP server exposing a card catalog and a benefit scraping tool over
/// stdio. Logging goes to stderr so stdout stays a clean JSON-RPC channel.
#[derive(Debug, Parser)]
#[command(name = "cardlens-mcp", version, about)]
struct Cli {
    /// Path to the card catalog JSON (ordered array of {name, url}).
    /// Falls back to $CARDLENS_CATALOG, then resources/cards.json.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Run the browser with a visible window (debugging).
    #[arg(long)]
    headed: bool,

    /// Navigation timeout in seconds.
    #[arg(long, default_value_t = 60)]
    navigation_timeout_secs: u64,

    /// Per-anchor structural wait timeout in seconds.
    #[arg(long, default_value_t = 30)]
    selector_timeout_secs: u64,

    /// Settle pause between toggle activations in milliseconds.
    #[arg(long, default_value_t = 500)]
    settle_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let catalog_path = cli
        .catalog
        .or_else(|| std::env::var("CARDLENS_CATALOG").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("resources/cards.json"));
    let catalog = CardCatalog::load(&catalog_path)
        .with_context(|| format!("loading card catalog from {}", catalog_path.display()))?;
    info!(
        cards = catalog.len(),
        path = %catalog_path.display(),
        "card catalog loaded"
    );

    let options = RenderOptions {
        navigation_timeout: Duration::from_secs(cli.navigation_timeout_secs),
        selector_timeout: Duration::from_secs(cli.selector_timeout_secs),
        settle: Duration::from_millis(cli.settle_ms),
    };
    let browser = ChromiumBrowser::new(ChromiumConfig {
        headed: cli.headed,
        executable: None,
    });
    let server = CardLensServer::new(catalog, ScrapePipeline::new(Box::new(browser), options));

    info!("cardlens-mcp listening on stdio");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        if let Some(response) = server.handle_line(&line).await {
            stdout
                .write_all(response.as_bytes())
                .await
                .context("writing response")?;
            stdout.write_all(b"\n").await.context("writing response")?;
            stdout.flush().await.context("flushing stdout")?;
        }
    }
    info!("stdin closed, shutting down");

    Ok(())
}
