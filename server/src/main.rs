//! docsearch Entry Point
//!
//! Modes:
//! - `serve` (default): Model Context Protocol over stdio for AI clients
//! - `search`: run one query against the documentation bundle
//! - `count`: count a word on a web page, optionally listing each match
//! - `fetch`: print the start of a page as markdown

use clap::{Args, Parser, Subcommand};
use docsearch_index::find_word;
use docsearch_server::config::{
    ServerConfig, DEFAULT_ARCHIVE, DEFAULT_NUM_RESULTS, DEFAULT_READER_URL,
};
use docsearch_server::fetch::{PageFetcher, PageSource};
use docsearch_server::format::{format_search_results, format_word_count, format_word_matches};
use docsearch_server::mcp::{McpBackend, McpServer};
use docsearch_server::{load_index, ServerError, ServerResult};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Characters of page text printed by `fetch`.
const FETCH_PREVIEW_CHARS: usize = 1000;

/// Characters of context shown around each match by `count --context`.
const MATCH_CONTEXT_CHARS: usize = 50;

#[derive(Parser)]
#[command(name = "docsearch")]
#[command(about = "Documentation search MCP server and page word counter")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    options: GlobalOptions,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args)]
struct GlobalOptions {
    /// Zip bundle with the documentation to index
    #[arg(long, short, env = "DOCSEARCH_ARCHIVE", default_value = DEFAULT_ARCHIVE, global = true)]
    archive: PathBuf,

    /// Reader proxy used to fetch pages as markdown
    #[arg(long, env = "DOCSEARCH_READER_URL", default_value = DEFAULT_READER_URL, global = true)]
    reader_url: String,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    timeout: u64,

    /// Verbose logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Serve MCP over stdio (default)
    Serve,
    /// Search the documentation bundle
    Search {
        query: String,
        /// Number of results (clamped to 1..=10)
        #[arg(long, short = 'n', default_value_t = DEFAULT_NUM_RESULTS as i64)]
        num_results: i64,
    },
    /// Count whole-word occurrences of a word on a web page
    Count {
        url: String,
        word: String,
        /// List every occurrence with surrounding text
        #[arg(long)]
        context: bool,
    },
    /// Print the start of a web page as markdown
    Fetch { url: String },
}

impl GlobalOptions {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            archive: self.archive.clone(),
            reader_url: self.reader_url.clone(),
            fetch_timeout: Duration::from_secs(self.timeout),
            ..ServerConfig::default()
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries JSON-RPC in serve mode
    let log_filter = if cli.options.verbose {
        "docsearch_server=debug,docsearch_index=debug"
    } else {
        "docsearch_server=info,docsearch_index=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.options.server_config();
    let command = cli.command.unwrap_or(Command::Serve);

    if let Err(e) = run(command, config).await {
        tracing::error!("{}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Command, config: ServerConfig) -> ServerResult<()> {
    match command {
        Command::Serve => {
            tracing::info!("Starting docsearch MCP server");
            tracing::info!("Archive: {:?}", config.archive);

            let index = load_index(&config)?;
            let pages: Arc<dyn PageSource> = Arc::new(PageFetcher::from_config(&config));
            let mut server = McpServer::new(McpBackend::new(index, pages, config));
            server.run().await?;
        }

        Command::Search { query, num_results } => {
            let index = load_index(&config)?;
            let hits = index.search(&query, &config.search_options(Some(num_results)))?;
            println!("{}", format_search_results(&query, &hits, config.preview_chars));
        }

        Command::Count { url, word, context } => {
            let fetcher = PageFetcher::from_config(&config);
            let target = url.clone();
            let content = tokio::task::spawn_blocking(move || fetcher.fetch_markdown(&target))
                .await
                .map_err(|e| ServerError::fetch(&url, e))??;

            let matches = find_word(&content, &word);
            println!("{}", format_word_count(&word, matches.len(), &url));
            if context {
                println!();
                println!(
                    "{}",
                    format_word_matches(&content, &word, &matches, MATCH_CONTEXT_CHARS)
                );
            }
        }

        Command::Fetch { url } => {
            let fetcher = PageFetcher::from_config(&config);
            let target = url.clone();
            let content = tokio::task::spawn_blocking(move || fetcher.fetch_markdown(&target))
                .await
                .map_err(|e| ServerError::fetch(&url, e))??;

            let head: String = content.chars().take(FETCH_PREVIEW_CHARS).collect();
            println!("{head}");
            println!("\n{}", "=".repeat(60));
            println!("Fetched {} characters", content.chars().count());
        }
    }

    Ok(())
}
