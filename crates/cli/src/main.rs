//! # Janus CLI
//!
//! Command-line interface for the janus authentication backend.
//!
//! ## Usage
//!
//! ```bash
//! janus serve        # Start the API server (runs migrations automatically)
//! janus migrate      # Run database migrations
//! janus validate     # Verify configuration
//! janus --help       # Show help
//! ```

use clap::{Args, CommandFactory as _, Parser, Subcommand};
use error::{AppError, Result};
use migration::MigratorTrait;

mod commands;
mod config;
mod server;

/// Janus - authentication and account-verification backend
#[derive(Parser, Debug)]
#[command(name = "janus")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (debug, info, warn, error)
    #[arg(short = 'L', long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    /// Output format (json, pretty, compact)
    #[arg(short = 'F', long, env = "JANUS_LOG_FORMAT", default_value = "pretty")]
    log_format: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the API server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate,

    /// Generate shell completions
    Completions(commands::CompletionsArgs),

    /// Verify configuration
    Validate,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Server host to bind to
    #[arg(long, env = "JANUS_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Server port
    #[arg(short, long, env = "JANUS_PORT", default_value = "3000")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level, &cli.log_format, None)
        .map_err(|e| AppError::config(format!("Failed to initialize logging: {e}")))?;

    match cli.command {
        Commands::Serve(args) => server::serve(&args.host, args.port).await,
        Commands::Migrate => migrate().await,
        Commands::Completions(args) => {
            commands::generate_completions(&args, &mut Cli::command());
            Ok(())
        },
        Commands::Validate => commands::validate(),
    }
}

async fn migrate() -> Result<()> {
    let db_config = config::DatabaseConfig::from_env()?;
    let db = migration::connect_to_database(&config::build_database_url(&db_config)).await?;

    migration::Migrator::up(&db, None).await?;

    tracing::info!("Migrations applied");
    Ok(())
}
