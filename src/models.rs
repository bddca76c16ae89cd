use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Short link row in the database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Link {
    pub id: Uuid,
    pub short_code: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
}

/// A single recorded redirect
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Click {
    pub id: Uuid,
    pub link_id: Uuid,
    pub clicked_at: DateTime<Utc>,
}

/// Click count for one link in one calendar month (UTC), as `YYYY-MM`
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct MonthlyClickCount {
    pub link_id: Uuid,
    pub month: String,
    pub clicks: i64,
}

/// Whether `create_link` inserted a row or found one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkCreation {
    Created,
    Existing,
}

impl LinkCreation {
    pub fn is_new(self) -> bool {
        matches!(self, LinkCreation::Created)
    }
}

/// Request to issue a short link
#[derive(Debug, Deserialize)]
pub struct CreateLinkRequest {
    /// Missing is treated the same as empty so both are rejected by validation
    #[serde(default)]
    pub target_url: String,
}

/// Response after issuing a short link
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResponse {
    pub short_code: String,
    pub short_url: String,
    pub target_url: String,
    pub created_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn new(link: Link, base_url: &str) -> Self {
        LinkResponse {
            short_url: format!("{}/{}", base_url, link.short_code),
            short_code: link.short_code,
            target_url: link.target_url,
            created_at: link.created_at,
        }
    }
}

/// Query parameters for the stats endpoint
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBreakdown {
    pub month: String,
    pub clicks: i64,
}

/// Aggregated analytics for one link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkStats {
    pub short_code: String,
    pub target_url: String,
    pub total_clicks: i64,
    pub total_earnings: f64,
    pub monthly_breakdown: Vec<MonthlyBreakdown>,
}

/// One page of link analytics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub page: i64,
    pub limit: i64,
    pub total_links: i64,
    pub links: Vec<LinkStats>,
}
