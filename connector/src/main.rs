#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]
#![allow(clippy::print_stdout)]

use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use docdir_connector::{
    config::Config,
    directory::{
        suggest, DirectorySource, DynamicDirectory, HttpJsonFetcher, InMemoryDirectory,
        JsonFetcher, QueryFilter,
    },
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Resolve and search directory entries against the remote document API.
#[derive(Debug, Parser)]
#[command(name = "docdir", version, about)]
struct Cli {
    /// YAML configuration file (defaults to docdir.yaml when present).
    #[arg(short, long)]
    config: Option<String>,

    /// Lookup strategy.
    #[arg(short, long, value_enum, default_value_t = Mode::Dynamic)]
    mode: Mode,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// Query the remote service on every call.
    Dynamic,
    /// Load one listing page and filter it locally.
    InMemory,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve one entry by id.
    Get { id: String },
    /// Check whether an id resolves.
    Has { id: String },
    /// Print the ids matching a label.
    Search { label: String },
    /// Search, then resolve every hit to its entry.
    Suggest { label: String },
    /// Print every entry the source can enumerate.
    List,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(source: &dyn DirectorySource, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Get { id } => print_json(&source.get_entry(&id).await?),
        Command::Has { id } => print_json(&source.has_entry(&id).await?),
        Command::Search { label } => {
            print_json(&source.search(&QueryFilter::label(label), &[]).await?)
        }
        Command::Suggest { label } => print_json(&suggest(source, &QueryFilter::label(label)).await?),
        Command::List => print_json(&source.list_all_entries().await?),
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .map_err(|e| anyhow::anyhow!("{e}"))?;

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(
        base_url = %config.remote.base_url,
        mode = ?cli.mode,
        "docdir starting"
    );

    let fetcher: Arc<dyn JsonFetcher> = Arc::new(HttpJsonFetcher::from_config(&config.remote)?);
    let source: Box<dyn DirectorySource> = match cli.mode {
        Mode::Dynamic => Box::new(DynamicDirectory::from_config(fetcher, &config.remote)),
        Mode::InMemory => Box::new(InMemoryDirectory::from_config(fetcher, &config.remote)?),
    };

    run(source.as_ref(), cli.command).await
}
