use anyhow::Context;
use clap::{Parser, Subcommand};

use asrockind_mcp::config::CONFIG;
use asrockind_mcp::mcp::McpServer;
use asrockind_mcp::search::ProductSearcher;

#[derive(Parser)]
#[command(name = "asrockind-mcp", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the stdio MCP server (the default).
    Serve,
    /// Run one search and print the JSON response. Debugging aid.
    Search { query: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr: stdout is the MCP transport.
    let level = CONFIG
        .log_level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let searcher = ProductSearcher::from_config().context("failed to build HTTP client")?;

    match cli.command {
        None | Some(Command::Serve) => McpServer::new(searcher).run().await,
        Some(Command::Search { query }) => {
            let response = searcher.search(&query).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
    }
}
