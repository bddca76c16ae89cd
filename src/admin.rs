//! Administrative command handlers.
//!
//! CLI entry points for one-off tasks: initialising the database schema and
//! printing link analytics without starting the HTTP server.

use crate::config::{Config, StoreBackend};
use crate::db::Repository;
use crate::error::{AppError, AppResult};
use crate::models::StatsResponse;
use crate::server::connect_store;
use crate::services::AnalyticsService;
use clap::Subcommand;
use tracing::info;

/// Administrative commands available via CLI.
#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// Create the links and clicks tables (idempotent)
    Migrate,

    /// Show per-link clicks, earnings and monthly breakdown
    Stats {
        /// Page number, starting at 1
        #[arg(long)]
        page: Option<i64>,

        /// Links per page (at most 100)
        #[arg(long)]
        limit: Option<i64>,
    },
}

/// Run an administrative command with the given configuration.
pub async fn run(config: Config, admin_command: AdminCommands) -> AppResult<()> {
    match admin_command {
        AdminCommands::Migrate => migrate(config).await,
        AdminCommands::Stats { page, limit } => stats(config, page, limit).await,
    }
}

/// Run database migrations.
async fn migrate(config: Config) -> AppResult<()> {
    if config.database.backend != StoreBackend::Postgres {
        return Err(AppError::Configuration(
            "migrate requires STORE_BACKEND=postgres".to_string(),
        ));
    }

    info!("Running database migrations...");

    let repository = Repository::new(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
        config.database.acquire_timeout_seconds,
    )
    .await?;

    repository.run_migrations().await?;

    info!("Migrations completed successfully");
    Ok(())
}

/// Display link analytics.
async fn stats(config: Config, page: Option<i64>, limit: Option<i64>) -> AppResult<()> {
    info!("Fetching statistics...");

    let store = connect_store(&config.database, false).await?;
    let stats = AnalyticsService::new(store).get_stats(page, limit).await?;

    print!("{}", render_stats(&stats));
    Ok(())
}

fn render_stats(stats: &StatsResponse) -> String {
    let mut out = String::new();
    out.push_str("\n=== sharelink Statistics ===\n");
    out.push_str(&format!(
        "Page {} (limit {}), {} link(s) in total\n",
        stats.page, stats.limit, stats.total_links
    ));

    for link in &stats.links {
        out.push_str(&format!(
            "\n{}  {}\n  clicks: {}  earnings: ${:.2}\n",
            link.short_code, link.target_url, link.total_clicks, link.total_earnings
        ));
        for month in &link.monthly_breakdown {
            out.push_str(&format!("    {}  {}\n", month.month, month.clicks));
        }
    }

    out.push('\n');
    out
}
