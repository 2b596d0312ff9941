use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "Rollcall - list and search patients from the local cache or the server", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand; they override `config.toml`.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Directory holding config.toml, credentials.json and search_prefs.toml
    #[arg(long, global = true, env = "ROLLCALL_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Local patient cache (JSON)
    #[arg(long, global = true)]
    pub patients: Option<PathBuf>,

    /// Base URL of the patient server, e.g. https://host/openmrs
    #[arg(long, global = true)]
    pub server_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the patients of a cohort, or every cached patient
    List {
        #[arg(long)]
        cohort: Option<String>,
    },
    /// Search patients by name or identifier
    Search {
        text: String,
        /// Search on the server instead of the local cache
        #[arg(long)]
        server: bool,
        /// Restrict a local search to this cohort
        #[arg(long)]
        cohort: Option<String>,
    },
    /// Show the search mode used last
    Mode,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let ctx = commands::Context::load(&cli.global)?;

    match cli.command {
        Commands::List { cohort } => commands::query::list(&ctx, cohort).await?,
        Commands::Search {
            text,
            server,
            cohort,
        } => commands::query::search(&ctx, text, server, cohort).await?,
        Commands::Mode => commands::mode::show(&ctx).await?,
    }

    Ok(())
}
