use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;

use floorwatch::config::{FloorConfig, LogFormat};
use floorwatch::logging;

mod cmd;

#[derive(Parser)]
#[command(name = "floorwatch")]
#[command(version, about = "Factory floor metrics server and chatbot")]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the metrics API
    Serve {
        /// Port to serve on (overrides floorwatch.toml and FLOORWATCH_PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// CSV dataset to load
        #[arg(long)]
        data_path: Option<PathBuf>,

        /// Disable the permissive CORS layer
        #[arg(long)]
        no_cors: bool,
    },
    /// Print computed metrics as JSON
    Report {
        /// CSV dataset to load
        #[arg(long)]
        data_path: Option<PathBuf>,

        /// Which view to print
        #[arg(long, value_enum, default_value_t = cmd::ReportSection::All)]
        section: cmd::ReportSection,

        /// Fail instead of printing placeholder values when the dataset cannot be loaded
        #[arg(long)]
        strict: bool,
    },
    /// Ask the factory chatbot a question
    Ask {
        /// The question, e.g. "How's our efficiency?"
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,

        /// CSV dataset to load
        #[arg(long)]
        data_path: Option<PathBuf>,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default floorwatch.toml file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    // A broken config file is reported by the command itself; logging still starts.
    let _log_guard = match FloorConfig::new(project_dir.clone()) {
        Ok(config) => logging::init_tracing(
            config.toml.logging.format,
            config.log_dir().as_deref(),
            level,
        )?,
        Err(_) => logging::init_tracing(LogFormat::default(), None, level)?,
    };

    match &cli.command {
        Commands::Serve {
            port,
            host,
            data_path,
            no_cors,
        } => {
            let config = FloorConfig::with_cli_args(
                project_dir,
                host.clone(),
                *port,
                data_path.clone(),
                *no_cors,
            )?;
            cmd::cmd_serve(&config).await?;
        }
        Commands::Report {
            data_path,
            section,
            strict,
        } => {
            let config =
                FloorConfig::with_cli_args(project_dir, None, None, data_path.clone(), false)?;
            cmd::cmd_report(&config, *section, *strict)?;
        }
        Commands::Ask {
            question,
            data_path,
        } => {
            let config =
                FloorConfig::with_cli_args(project_dir, None, None, data_path.clone(), false)?;
            cmd::cmd_ask(&config, &question.join(" ")).await?;
        }
        Commands::Config { command } => cmd::cmd_config(&project_dir, command.clone())?,
    }

    Ok(())
}
