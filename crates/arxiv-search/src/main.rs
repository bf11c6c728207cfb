//! arXiv search - Entry Point
//!
//! Runs one search and prints the result cards.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use arxiv_search::config::{Config, api};
use arxiv_search::formatters::render_view;
use arxiv_search::models::{ResponseFormat, SearchQuery};
use arxiv_search::session::SearchView;
use arxiv_search::version::spawn_version_check;
use arxiv_search::{ArxivClient, SearchSession};

#[derive(Parser, Debug)]
#[command(name = "arxiv-search")]
#[command(about = "Search the arXiv catalog and print result cards")]
#[command(version)]
struct Cli {
    /// Keywords, paper title, or author name
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,

    /// Zero-based offset of the first result
    #[arg(long, default_value_t = 0)]
    start: u32,

    /// Number of results to fetch
    #[arg(long, default_value_t = api::DEFAULT_MAX_RESULTS)]
    max_results: u32,

    /// Output format
    #[arg(long, value_enum, default_value_t = ResponseFormat::Markdown)]
    format: ResponseFormat,

    /// arXiv query endpoint (for mirrors and testing)
    #[arg(long, env = "ARXIV_API_URL")]
    api_url: Option<String>,

    /// Retries for transient failures
    #[arg(long, default_value_t = api::MAX_RETRIES)]
    retries: u32,

    /// Skip the background check for a newer release
    #[arg(
        long,
        env = "ARXIV_SEARCH_NO_VERSION_CHECK",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    no_version_check: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let mut config = Config::from_env()?.with_max_retries(cli.retries);
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }
    if cli.no_version_check {
        config.version_check = false;
    }

    tracing::info!(version = env!("CARGO_PKG_VERSION"), api_url = %config.api_url, "Starting arXiv search");

    let version_check = spawn_version_check(&config);

    let client = ArxivClient::new(config)?;
    let session = SearchSession::new(Arc::new(client));

    let query =
        SearchQuery::new(cli.query.join(" ")).with_start(cli.start).with_max_results(cli.max_results);

    if let Err(err) = session.submit(query).await {
        eprintln!("{}", err.to_user_message());
        return Ok(ExitCode::from(2));
    }

    let view = session.view().await;
    println!("{}", render_view(&view, cli.format));

    match tokio::time::timeout(api::VERSION_CHECK_TIMEOUT, version_check).await {
        Ok(Ok(Some(notice))) => eprintln!("\n{notice}"),
        Ok(Ok(None)) => {}
        Ok(Err(err)) => tracing::debug!(error = %err, "Version check task failed"),
        Err(_) => tracing::debug!("Version check timed out"),
    }

    Ok(if matches!(view, SearchView::Failed { .. }) { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
