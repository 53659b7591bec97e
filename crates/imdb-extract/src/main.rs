// Copyright 2026 imdb-extract Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use imdb_extract::cli;
use imdb_extract::{BoxOffice, EntityKind, FetchClient, ScraperConfig, Search, TopRanked};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "imdb-extract",
    about = "Extract IMDb title data through a headless browser",
    version
)]
struct Cli {
    /// JSON config file (selectors, delays, base URL)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the site base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every attribute of one title as JSON
    Title {
        /// Title id without the "tt" prefix (e.g. "0095016")
        id: String,
        /// Kind of title
        #[arg(long, value_enum, default_value = "movie")]
        kind: cli::KindArg,
    },
    /// Search titles by name
    Search {
        /// Free-text query
        query: String,
    },
    /// Print the top-ranked chart
    Top,
    /// Print the current box-office list
    BoxOffice,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let level = if args.verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("imdb_extract={level}").parse()?);
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);
    if args.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let output = match args.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "imdb-extract", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Title { id, kind } => {
            let client = connect(args.config, args.base_url).await?;
            cli::title_record(&client, &id, EntityKind::from(kind)).await?
        }
        Commands::Search { query } => {
            let client = connect(args.config, args.base_url).await?;
            cli::list_json(&Search::new(client, query).refs().await?)?
        }
        Commands::Top => {
            let client = connect(args.config, args.base_url).await?;
            cli::list_json(&TopRanked::new(client).refs().await?)?
        }
        Commands::BoxOffice => {
            let client = connect(args.config, args.base_url).await?;
            cli::list_json(&BoxOffice::new(client).refs().await?)?
        }
    };

    println!("{output}");
    Ok(())
}

async fn connect(config_path: Option<PathBuf>, base_url: Option<String>) -> Result<FetchClient> {
    let mut config = match config_path {
        Some(path) => ScraperConfig::load(&path)?,
        None => ScraperConfig::default(),
    }
    .apply_env();
    if let Some(base) = base_url {
        config.base_url = base;
    }

    FetchClient::launch(config)
        .await
        .context("could not start the rendering session")
}
