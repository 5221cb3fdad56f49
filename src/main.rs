use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use docketfetch::render::ProxyRenderer;
use docketfetch::{CrawlConfig, Crawler, Renderer, RetryPolicy};

#[derive(Parser, Debug)]
#[command(
    name = "docketfetch",
    version,
    about = "Crawl the FTC case search index and download dispositive case documents"
)]
struct Args {
    /// Search text submitted to the case index
    query: String,

    /// Existing directory where downloaded documents are written
    #[arg(short, long)]
    destination: PathBuf,

    /// Concurrent document downloads
    #[arg(long, default_value_t = 4)]
    concurrency: usize,

    /// Attempts for page renders and document downloads
    #[arg(long, default_value_t = 2)]
    retry_attempts: usize,

    /// Seconds between retry attempts
    #[arg(long, default_value_t = 2)]
    retry_delay: u64,

    /// Render pages through a JS-rendering proxy instead of a local browser
    #[arg(long, env = "SCRAPEOPS_API_KEY")]
    proxy_api_key: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .filter_module("selectors", log::LevelFilter::Warn)
        .filter_module("html5ever", log::LevelFilter::Error)
        .init();

    let args = Args::parse();

    let config = CrawlConfig::new(args.query.clone(), args.destination.clone())
        .with_download_concurrency(args.concurrency)
        .with_retry(RetryPolicy {
            attempts: args.retry_attempts,
            delay: Duration::from_secs(args.retry_delay),
        });

    let renderer = build_renderer(&args).await?;
    let crawler = Crawler::new(renderer, config)?;
    let summary = crawler.run().await?;

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn build_renderer(args: &Args) -> anyhow::Result<Box<dyn Renderer>> {
    if let Some(api_key) = &args.proxy_api_key {
        return Ok(Box::new(ProxyRenderer::new(api_key.clone())?));
    }

    #[cfg(feature = "browser")]
    {
        Ok(Box::new(
            docketfetch::render::ChromiumRenderer::launch().await?,
        ))
    }
    #[cfg(not(feature = "browser"))]
    {
        anyhow::bail!("built without browser support; pass --proxy-api-key to render through a proxy")
    }
}
