use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fixsteps_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "fixsteps")]
#[command(author, version, about = "Read a document one full-screen step at a time")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Document to open (shorthand for `run`)
    file: Option<PathBuf>,

    /// Config file to use instead of ~/.config/fixsteps/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a document in the step navigator
    Run {
        file: PathBuf,
    },
    /// Print the steps discovered in a document
    Steps {
        file: PathBuf,
        /// Terminal width to lay the document out for
        #[arg(long, default_value_t = 80)]
        width: u16,
        /// Terminal height to lay the document out for
        #[arg(long, default_value_t = 24)]
        height: u16,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file location
    Path,
    /// Write the default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(AppConfig::config_path);
    let config = AppConfig::load_from(&config_path)?;

    let command = match (cli.command, cli.file) {
        (Some(command), _) => command,
        (None, Some(file)) => Commands::Run { file },
        (None, None) => {
            Cli::command().print_help()?;
            return Ok(());
        }
    };

    // The TUI owns the terminal, so it logs to a file
    let log_file = matches!(command, Commands::Run { .. }).then(|| config.log_path());
    init_logging(&config, log_file.as_deref())?;

    match command {
        Commands::Run { file } => commands::run::run(config, &file),
        Commands::Steps {
            file,
            width,
            height,
            json,
        } => commands::steps::run(&config, &file, width, height, json),
        Commands::Config { action } => match action {
            ConfigAction::Path => commands::config::path(&config_path),
            ConfigAction::Init { force } => commands::config::init(&config_path, force),
        },
    }
}

fn init_logging(config: &AppConfig, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }

    Ok(())
}
