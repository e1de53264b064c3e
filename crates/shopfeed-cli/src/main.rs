use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shopfeed_export::{run_pass, ExportContext};
use shopfeed_shopify::ShopifyClient;

#[derive(Debug, Parser)]
#[command(name = "shopfeed")]
#[command(about = "Shopify catalog feed exporter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a single export pass and exit.
    ///
    /// On failure nothing is published and the exit code is non-zero.
    Export,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = shopfeed_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Export => {
            let client = ShopifyClient::new(&config)?;
            let ctx = ExportContext::new(client, &config);
            let summary = run_pass(&ctx).await?;
            tracing::info!(
                pages = summary.pages,
                products = summary.products,
                rows = summary.rows,
                published = %ctx.published_path.display(),
                "export pass complete"
            );
        }
    }

    Ok(())
}
