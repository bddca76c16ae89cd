//! Persistence seam shared by every service.
//!
//! `LinkStore` is implemented by the PostgreSQL [`Repository`](crate::db::Repository)
//! and by the in-process [`MemoryStore`]. Both enforce uniqueness of
//! `short_code` and `target_url` themselves and report a clash as
//! [`AppError::UniquenessConflict`](crate::error::AppError::UniquenessConflict).

pub mod memory;

use crate::error::AppResult;
use crate::models::{Click, Link, MonthlyClickCount};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub use memory::MemoryStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Exact-match lookup by target URL.
    async fn find_link_by_target_url(&self, target_url: &str) -> AppResult<Option<Link>>;

    async fn find_link_by_short_code(&self, short_code: &str) -> AppResult<Option<Link>>;

    /// Inserts a new link. Fails with `UniquenessConflict` naming the column
    /// that clashed; no row is written in that case.
    async fn insert_link(&self, short_code: &str, target_url: &str) -> AppResult<Link>;

    async fn record_click(&self, link_id: Uuid, clicked_at: DateTime<Utc>) -> AppResult<Click>;

    async fn count_links(&self) -> AppResult<i64>;

    /// Links ordered by `created_at`, then `id`, both ascending.
    async fn list_links(&self, limit: i64, offset: i64) -> AppResult<Vec<Link>>;

    /// One row per (link, UTC month) holding at least one click.
    async fn monthly_click_counts(&self, link_ids: &[Uuid]) -> AppResult<Vec<MonthlyClickCount>>;

    /// Cheap round trip used by the health check.
    async fn ping(&self) -> AppResult<()>;
}
