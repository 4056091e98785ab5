//! CLI command definitions and dispatch.

pub mod config;
pub mod migrate;
pub mod serve;
pub mod user;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use telehub_core::error::AppError;

/// TeleHub — Telework & Attendance Management Platform
#[derive(Debug, Parser)]
#[command(name = "telehub", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (loads config/default.toml + config/<env>.toml)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the TeleHub server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// User management
    User(user::UserArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.env).await,
            Commands::Migrate(args) => migrate::execute(args, &self.env).await,
            Commands::User(args) => user::execute(args, &self.env, self.format).await,
            Commands::Config(args) => config::execute(args, &self.env, self.format).await,
        }
    }
}

/// Helper: load configuration for the given environment
pub fn load_config(env: &str) -> Result<telehub_core::config::AppConfig, AppError> {
    telehub_core::config::AppConfig::load(env)
}

/// Helper: create database pool from config
pub async fn create_db_pool(
    config: &telehub_core::config::AppConfig,
) -> Result<sqlx::PgPool, AppError> {
    let pool = telehub_database::connection::DatabasePool::connect(&config.database).await?;
    Ok(pool.into_pool())
}
