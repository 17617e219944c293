//! # Factlens CLI Application
//!
//! Terminal front end for the comparative view engine. `view` opens the
//! Ratatui TUI; the other subcommands are scriptable and print JSON.

mod commands;
mod demo;
mod tui;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Factlens: compare search results across attributes
#[derive(Parser, Debug)]
#[command(name = "factlens", version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "factlens.toml", global = true)]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Browse a result document in the terminal
    View {
        /// Result document (search response or bare attribute map)
        file: Option<PathBuf>,

        /// Use the bundled sample results
        #[arg(long, conflicts_with = "file")]
        demo: bool,
    },
    /// Print the view model of one page as JSON
    Inspect {
        file: Option<PathBuf>,

        #[arg(long, conflicts_with = "file")]
        demo: bool,

        /// Zero-based page to render
        #[arg(short, long, default_value = "0")]
        page: isize,
    },
    /// Print the search request payload built from the config
    Request {
        /// Search query
        #[arg(short, long)]
        query: String,

        /// Extra aspect to compare; repeatable
        #[arg(short, long = "aspect")]
        aspects: Vec<String>,
    },
    /// Write a default config file
    InitConfig {
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, Commands::View { .. });
    let _guard = init_tracing(cli.verbose, interactive);

    let config = lens_core::load_config(&cli.config)
        .with_context(|| format!("Configuration error in {}", cli.config.display()))?;

    match cli.command {
        Commands::View { file, demo } => {
            let results = commands::load_document(file.as_deref(), demo)?;
            tui::run(config.viewer, results)
        }
        Commands::Inspect { file, demo, page } => {
            let results = commands::load_document(file.as_deref(), demo)?;
            commands::inspect(config.viewer, results, page)
        }
        Commands::Request { query, aspects } => commands::request(config.search, &query, &aspects),
        Commands::InitConfig { path, force } => commands::init_config(&path, force),
    }
}

/// Log to stderr for one-shot commands. The TUI owns the terminal, so in
/// that mode logs go to a file instead.
fn init_tracing(verbose: u8, interactive: bool) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if interactive {
        let file_appender = tracing_appender::rolling::never(std::env::temp_dir(), "factlens.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(non_blocking)
            .with_filter(filter());
        tracing_subscriber::registry().with(file_layer).init();
        Some(guard)
    } else {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(filter());
        tracing_subscriber::registry().with(stderr_layer).init();
        None
    }
}
