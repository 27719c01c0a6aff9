mod extract;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use psstore_core::Environment;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "psstore")]
#[command(about = "Extract game records from PlayStation Store pages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch product or concept pages and extract one record per page
    Game {
        /// Product or concept page links
        #[arg(required = true)]
        hrefs: Vec<String>,
        /// Record id to use instead of the one derived from the page (single link only)
        #[arg(long)]
        id: Option<String>,
        /// Write JSON here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Extract a record from saved page markup
    Parse {
        file: PathBuf,
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List the game links on a saved browse page
    Links {
        file: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = psstore_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    let decorated = decorated_logs(&config.env);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(decorated)
        .with_target(decorated)
        .init();
    tracing::debug!(env = %config.env, "configuration loaded");

    let cli = Cli::parse();
    match cli.command {
        Commands::Game { hrefs, id, out } => {
            extract::run_game(&config, &hrefs, id.as_deref(), out.as_deref()).await
        }
        Commands::Parse { file, id, out } => {
            extract::run_parse(&file, id.as_deref(), out.as_deref())
        }
        Commands::Links { file, out } => extract::run_links(&config, &file, out.as_deref()),
    }
}

/// Colour and event targets are for a developer's terminal only.
fn decorated_logs(env: &Environment) -> bool {
    matches!(env, Environment::Development)
}
