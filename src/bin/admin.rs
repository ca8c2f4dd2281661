//! CLI administration tool for catalog-api.
//!
//! Maintenance tasks that do not belong behind the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Delete expired tokens
//! cargo run --bin admin -- token purge-expired
//!
//! # Revoke every authentication token of a user
//! cargo run --bin admin -- token revoke --user-id 42 --scope authentication
//!
//! # Row counts
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server, see [`catalog_api::config`]. `TOKEN_SIGNING_SECRET`
//! is required because token commands go through the token service.

use catalog_api::application::services::{TokenHasher, TokenService};
use catalog_api::config;
use catalog_api::domain::entities::TokenScope;
use catalog_api::infrastructure::persistence::{PgCatalogStats, PgTokenRepository};
use catalog_api::server::connect_pool;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing catalog-api.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage bearer tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show row counts
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Token management subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Delete every token whose expiry has passed
    PurgeExpired {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Revoke all tokens of one user in one scope
    Revoke {
        #[arg(long)]
        user_id: i64,

        /// `activation` or `authentication`
        #[arg(long, default_value = "authentication")]
        scope: TokenScope,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;
    let pool = connect_pool(&config).await?;

    let outcome = match cli.command {
        Commands::Token { action } => {
            let hasher = TokenHasher::new(config.token_signing_secret.as_bytes())
                .map_err(|e| anyhow!("Invalid TOKEN_SIGNING_SECRET: {e}"))?;
            let repo = PgTokenRepository::new(Arc::new(pool.clone()))
                .with_timeout(config.query_timeout());
            let service = TokenService::new(Arc::new(repo), hasher);
            handle_token_action(action, &service).await
        }
        Commands::Stats => {
            let stats =
                PgCatalogStats::new(Arc::new(pool.clone())).with_timeout(config.query_timeout());
            handle_stats(&stats).await
        }
        Commands::Db { action } => handle_db_action(action, &pool).await,
    };

    pool.close().await;
    outcome
}

async fn handle_token_action(
    action: TokenAction,
    service: &TokenService<PgTokenRepository>,
) -> Result<()> {
    match action {
        TokenAction::PurgeExpired { yes } => purge_expired(service, yes).await,
        TokenAction::Revoke {
            user_id,
            scope,
            yes,
        } => revoke(service, user_id, scope, yes).await,
    }
}

async fn purge_expired(service: &TokenService<PgTokenRepository>, skip_confirm: bool) -> Result<()> {
    println!("{}", "🧹 Purge Expired Tokens".bright_blue().bold());
    println!();

    if !skip_confirm && !confirm("Delete all expired tokens?", true)? {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    let removed = service
        .purge_expired()
        .await
        .map_err(|e| anyhow!("Failed to purge tokens: {e}"))?;

    println!(
        "{} {}",
        "✅ Removed".green().bold(),
        format!("{removed} expired token(s)").bright_white()
    );
    println!();

    Ok(())
}

/// Revokes every token of `user_id` in `scope`.
///
/// Requires confirmation (default: No) unless `--yes` is passed.
async fn revoke(
    service: &TokenService<PgTokenRepository>,
    user_id: i64,
    scope: TokenScope,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔒 Revoke Tokens".bright_blue().bold());
    println!();
    println!("  User:  {}", user_id.to_string().cyan());
    println!("  Scope: {}", scope.as_str().cyan());
    println!();

    if !skip_confirm && !confirm("Revoke these tokens?", false)? {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    let removed = service
        .revoke_all(scope, user_id)
        .await
        .map_err(|e| anyhow!("Failed to revoke tokens: {e}"))?;

    if removed == 0 {
        println!("{}", "⚠️  No tokens found".yellow());
    } else {
        println!(
            "{} {}",
            "✅ Revoked".green().bold(),
            format!("{removed} token(s)").bright_white()
        );
    }
    println!();

    Ok(())
}

fn confirm(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Displays row counts for the main tables.
async fn handle_stats(stats: &PgCatalogStats) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let counts = stats
        .collect()
        .await
        .map_err(|e| anyhow!("Failed to collect statistics: {e}"))?;

    println!(
        "  Products:     {}",
        counts.products.to_string().bright_green().bold()
    );
    println!(
        "  Reviews:      {}",
        counts.reviews.to_string().bright_green().bold()
    );
    println!(
        "  Users:        {} ({} activated)",
        counts.users.to_string().bright_green().bold(),
        counts.activated_users.to_string().green()
    );
    println!(
        "  Live tokens:  {}",
        counts.live_tokens.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
                .fetch_one(pool)
                .await
                .unwrap_or(0);

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Migrations: {}", applied.to_string().bright_white());
            println!();
        }
    }

    Ok(())
}
