use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scrollstop_core::{AppConfig, PageSpec};

mod commands;

#[derive(Parser)]
#[command(name = "scrollstop")]
#[command(author, version, about = "Section-snapping scroll pages in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file (defaults to ~/.config/scrollstop/config.toml)
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a page in the terminal
    Run {
        /// Page description (TOML); the built-in demo page when omitted
        #[arg(short = 'p', long)]
        page: Option<PathBuf>,
    },
    /// Replay a scripted input sequence and print the trace
    Simulate {
        /// Script file (JSON)
        script: PathBuf,
        /// Page description (TOML); the built-in demo page when omitted
        #[arg(short = 'p', long)]
        page: Option<PathBuf>,
        /// Print the full trace as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the effective configuration
    Config {
        /// Write the defaults to the config file if it does not exist
        #[arg(long)]
        init: bool,
    },
}

fn load_page(path: Option<&PathBuf>) -> Result<PageSpec> {
    let page = match path {
        Some(path) => PageSpec::load(path)
            .with_context(|| format!("Failed to load page {}", path.display()))?,
        None => PageSpec::demo()?,
    };
    Ok(page)
}

/// Log to a file while the terminal UI owns the screen, to stderr otherwise
fn init_logging(config: &AppConfig, to_file: bool) -> Result<()> {
    let filter = EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
    );

    let file_layer = if to_file {
        fs::create_dir_all(config.data_dir())?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.log_path())?;
        Some(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
    } else {
        None
    };
    let stderr_layer = if to_file {
        None
    } else {
        Some(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    let config = Arc::new(config);

    let tui = matches!(cli.command, Some(Commands::Run { .. }) | None);
    init_logging(&config, tui)?;

    // Handle commands
    match cli.command {
        Some(Commands::Run { page }) => {
            let page = load_page(page.as_ref())?;
            commands::run::run(config, page)
        }
        None => commands::run::run(config, PageSpec::demo()?),
        Some(Commands::Simulate { script, page, json }) => {
            let page = load_page(page.as_ref())?;
            commands::simulate::run(&config, page, &script, json)
        }
        Some(Commands::Config { init }) => commands::config::run(&config, cli.config.as_deref(), init),
    }
}
