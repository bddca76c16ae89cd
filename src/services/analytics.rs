//! Paginated per-link click analytics.

use crate::error::AppResult;
use crate::models::{LinkStats, MonthlyBreakdown, StatsResponse};
use crate::store::LinkStore;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

/// Earnings per click, in cents.
const CENTS_PER_CLICK: i64 = 5;

/// Page and page size after defaults and clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    /// Out-of-range values are clamped, never rejected.
    pub fn normalize(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Earnings for `clicks`, rounded to 2 decimal places.
pub fn earnings_for_clicks(clicks: i64) -> f64 {
    let cents = clicks.saturating_mul(CENTS_PER_CLICK);
    cents as f64 / 100.0
}

#[derive(Clone)]
pub struct AnalyticsService {
    store: Arc<dyn LinkStore>,
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self { store }
    }

    pub async fn get_stats(&self, page: Option<i64>, limit: Option<i64>) -> AppResult<StatsResponse> {
        let pagination = Pagination::normalize(page, limit);

        let total_links = self.store.count_links().await?;
        let links = self
            .store
            .list_links(pagination.limit, pagination.offset())
            .await?;

        let link_ids: Vec<Uuid> = links.iter().map(|link| link.id).collect();
        let mut months_by_link: HashMap<Uuid, Vec<MonthlyBreakdown>> = HashMap::new();
        for row in self.store.monthly_click_counts(&link_ids).await? {
            months_by_link
                .entry(row.link_id)
                .or_default()
                .push(MonthlyBreakdown {
                    month: row.month,
                    clicks: row.clicks,
                });
        }

        let links = links
            .into_iter()
            .map(|link| {
                let mut monthly_breakdown = months_by_link.remove(&link.id).unwrap_or_default();
                // "YYYY-MM" sorts chronologically as a string
                monthly_breakdown.sort_by(|a, b| a.month.cmp(&b.month));

                let total_clicks = monthly_breakdown.iter().map(|m| m.clicks).sum();

                LinkStats {
                    short_code: link.short_code,
                    target_url: link.target_url,
                    total_clicks,
                    total_earnings: earnings_for_clicks(total_clicks),
                    monthly_breakdown,
                }
            })
            .collect();

        Ok(StatsResponse {
            page: pagination.page,
            limit: pagination.limit,
            total_links,
            links,
        })
    }
}
