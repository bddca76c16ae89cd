use crate::error::{AppError, AppResult, UniqueField};
use crate::models::{Click, Link, MonthlyClickCount};
use crate::store::LinkStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    ConnectOptions, PgPool,
};
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// Constraint names declared in `migrations/`
const SHORT_CODE_CONSTRAINT: &str = "links_short_code_key";
const TARGET_URL_CONSTRAINT: &str = "links_target_url_key";

/// PostgreSQL-backed link store
#[derive(Clone)]
pub struct Repository {
    pub(crate) pool: PgPool,
}

impl Repository {
    /// Create a new repository with a connection pool
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout_seconds: u64,
    ) -> AppResult<Self> {
        let options = PgConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Configuration(format!("Invalid database URL: {}", e)))?
            .disable_statement_logging();

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(acquire_timeout_seconds))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Create the links and clicks tables if they do not exist yet.
    ///
    /// Safe to run on every start; applied migrations are skipped.
    pub async fn run_migrations(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Translate unique violations on `links` into `UniquenessConflict`.
fn map_insert_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            match db_err.constraint() {
                Some(SHORT_CODE_CONSTRAINT) => {
                    return AppError::UniquenessConflict(UniqueField::ShortCode)
                }
                Some(TARGET_URL_CONSTRAINT) => {
                    return AppError::UniquenessConflict(UniqueField::TargetUrl)
                }
                _ => {}
            }
        }
    }
    AppError::Database(err)
}

#[async_trait]
impl LinkStore for Repository {
    async fn find_link_by_target_url(&self, target_url: &str) -> AppResult<Option<Link>> {
        let result = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, short_code, target_url, created_at FROM links
            WHERE target_url = $1
            "#,
        )
        .bind(target_url)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    async fn find_link_by_short_code(&self, short_code: &str) -> AppResult<Option<Link>> {
        let result = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, short_code, target_url, created_at FROM links
            WHERE short_code = $1
            "#,
        )
        .bind(short_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    async fn insert_link(&self, short_code: &str, target_url: &str) -> AppResult<Link> {
        sqlx::query_as::<_, Link>(
            r#"
            INSERT INTO links (id, short_code, target_url, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, short_code, target_url, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(short_code)
        .bind(target_url)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)
    }

    async fn record_click(&self, link_id: Uuid, clicked_at: DateTime<Utc>) -> AppResult<Click> {
        let result = sqlx::query_as::<_, Click>(
            r#"
            INSERT INTO clicks (id, link_id, clicked_at)
            VALUES ($1, $2, $3)
            RETURNING id, link_id, clicked_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(link_id)
        .bind(clicked_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(result)
    }

    async fn count_links(&self) -> AppResult<i64> {
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM links")
            .fetch_one(&self.pool)
            .await?;

        Ok(result)
    }

    async fn list_links(&self, limit: i64, offset: i64) -> AppResult<Vec<Link>> {
        let results = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, short_code, target_url, created_at FROM links
            ORDER BY created_at ASC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(results)
    }

    async fn monthly_click_counts(&self, link_ids: &[Uuid]) -> AppResult<Vec<MonthlyClickCount>> {
        if link_ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = sqlx::query_as::<_, MonthlyClickCount>(
            r#"
            SELECT
                link_id,
                to_char(clicked_at AT TIME ZONE 'UTC', 'YYYY-MM') AS month,
                COUNT(*) AS clicks
            FROM clicks
            WHERE link_id = ANY($1)
            GROUP BY link_id, month
            ORDER BY link_id, month
            "#,
        )
        .bind(link_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(results)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
