//! `jobly` CLI entry-point.
//!
//! Available sub-commands:
//! - `serve`   — start the API server.
//! - `migrate` — run pending database migrations.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "jobly", about = "REST backend for company job postings", version)]
struct Cli {
    /// Postgres connection string.
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the REST API server.
    Serve {
        #[arg(long, env = "JOBLY_BIND", default_value = "0.0.0.0:3001")]
        bind: String,
        #[arg(long, env = "JOBLY_MAX_CONNECTIONS", default_value_t = 10)]
        max_connections: u32,
    },
    /// Run pending database migrations.
    Migrate {
        #[arg(long, env = "JOBLY_MAX_CONNECTIONS", default_value_t = 2)]
        max_connections: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let database_url = cli
        .database_url
        .context("DATABASE_URL must be set (or pass --database-url)")?;

    match cli.command {
        Command::Serve { bind, max_connections } => {
            let pool = db::pool::create_pool(&database_url, max_connections)
                .await
                .context("failed to connect to database")?;
            info!("Starting API server on {bind}");
            api::serve(&bind, pool).await.context("server error")?;
        }
        Command::Migrate { max_connections } => {
            let pool = db::pool::create_pool(&database_url, max_connections)
                .await
                .context("failed to connect to database")?;
            db::pool::run_migrations(&pool)
                .await
                .context("migration failed")?;
            info!("Migrations applied successfully");
        }
    }

    Ok(())
}
