//! dad-jokes: keep a board of dad jokes in the terminal
//!
//! Fetches unique jokes from icanhazdadjoke.com, lets you vote on them and
//! keeps the board in a JSON snapshot between runs.

mod cli;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{debug, info};

use dad_jokes::config::Config;
use dad_jokes::{CancellationFlag, FileStorage, HttpJokeSource, JokeBoard, JokeFetcher, JokeStore};

#[derive(Parser)]
#[command(name = "dad-jokes")]
#[command(about = "Fetch, vote on and keep a board of dad jokes")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "dad-jokes.toml")]
    config: String,

    /// Directory holding the saved board
    #[arg(short, long, env = "DAD_JOKES_DATA_DIR")]
    data_dir: Option<String>,

    /// Joke API endpoint
    #[arg(long, env = "DAD_JOKES_ENDPOINT")]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<cli::JokeCommands>,
}

impl Cli {
    /// Load the config file and apply flag/env overrides on top
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(Path::new(&self.config))?;
        if let Some(data_dir) = &self.data_dir {
            config.storage.data_dir = PathBuf::from(data_dir);
        }
        if let Some(endpoint) = &self.endpoint {
            config.api.endpoint = endpoint.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the board
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("dad_jokes=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    let config = cli.resolve_config()?;

    debug!(endpoint = %config.api.endpoint, "Joke API");
    debug!(data_dir = %config.storage.data_dir.display(), "Data dir");

    let store = JokeStore::open(FileStorage::new(&config.storage.data_dir), &config.storage.key);
    let fetcher = JokeFetcher::new(HttpJokeSource::new(&config.api)?)
        .with_limits(config.fetch.limits());
    let mut board = JokeBoard::new(store, fetcher, config.fetch.num_jokes_to_get);

    // Loading indicator
    let mut loading = board.subscribe_loading();
    tokio::spawn(async move {
        while loading.changed().await.is_ok() {
            if *loading.borrow_and_update() {
                eprintln!("Loading...");
            }
        }
    });

    let cancel = CancellationFlag::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, stopping after the current request");
            on_interrupt.cancel();
        }
    });

    let command = cli.command.unwrap_or(cli::JokeCommands::List);
    match cli::execute_command(&mut board, command, &cancel).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
