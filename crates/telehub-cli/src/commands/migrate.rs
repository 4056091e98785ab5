//! Database migration management commands.

use clap::{Args, Subcommand};

use crate::output;
use telehub_core::error::{AppError, ErrorKind};

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Show applied migrations
    Status,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, env: &str) -> Result<(), AppError> {
    let config = super::load_config(env)?;
    let pool = super::create_db_pool(&config).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            telehub_database::migration::run_migrations(&pool).await?;
            output::print_success("All migrations applied successfully.");
        }
        MigrateCommand::Status => {
            let rows: Vec<(i64, String)> = sqlx::query_as(
                "SELECT version, description FROM _sqlx_migrations ORDER BY version",
            )
            .fetch_all(&pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to read migration state", e)
            })?;

            if rows.is_empty() {
                println!("No migrations applied.");
            } else {
                println!("Applied migrations:");
                for (version, description) in &rows {
                    println!("  {} - {}", version, description);
                }
            }
        }
    }

    Ok(())
}
