mod catalog;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sqlx::PgPool;
use srvcat_core::AppConfig;
use srvcat_ingest::{IngestOptions, DEFAULT_MAX_ROWS};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "srvcat-cli")]
#[command(about = "Server catalog command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply or revert database migrations.
    Migrate {
        #[command(subcommand)]
        command: MigrateCommands,
    },
    /// Validate a catalog spreadsheet and store every row in one batch.
    Import { path: PathBuf },
    /// Validate a catalog spreadsheet without touching the database.
    Check {
        path: PathBuf,
        /// Maximum number of data rows accepted.
        #[arg(long, env = "SRVCAT_UPLOAD_MAX_ROWS", default_value_t = DEFAULT_MAX_ROWS)]
        max_rows: usize,
    },
}

#[derive(Debug, Subcommand)]
enum MigrateCommands {
    /// Apply all pending migrations.
    Up,
    /// Revert all applied migrations.
    Down,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(srvcat_core::log_level_from_env()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { path, max_rows } => {
            let rows = catalog::run_check(&path, IngestOptions { max_rows })?;
            println!("{}: {rows} valid rows", path.display());
        }
        Commands::Migrate { command } => {
            let config = srvcat_core::load_app_config()?;
            let pool = connect(&config).await?;
            match command {
                MigrateCommands::Up => {
                    let applied = srvcat_db::run_migrations(&pool).await?;
                    println!("applied {applied} migration(s)");
                }
                MigrateCommands::Down => {
                    let reverted = srvcat_db::revert_migrations(&pool).await?;
                    println!("reverted {reverted} migration(s)");
                }
            }
        }
        Commands::Import { path } => {
            let config = srvcat_core::load_app_config()?;
            let store = srvcat_db::PgCatalogStore::new(connect(&config).await?);
            let inserted =
                catalog::run_import(&store, &path, IngestOptions::from_app_config(&config)).await?;
            println!("{}: imported {inserted} rows", path.display());
        }
    }

    Ok(())
}

async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool_config = srvcat_db::PoolConfig::from_app_config(config);
    Ok(srvcat_db::connect_pool(&config.database_url, pool_config).await?)
}
