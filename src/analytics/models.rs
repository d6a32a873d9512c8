//! Data models for visit analytics

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::ShortLink;

/// One visit as recorded on the redirect path. All derived fields are
/// best-effort; `device` falls back to `desktop`.
#[derive(Debug, Clone)]
pub struct NewVisit {
    pub short_id: String,
    pub ip: Option<String>,
    pub country: Option<String>,
    pub user_agent: Option<String>,
    pub device: String,
    pub browser: Option<String>,
    pub referrer: Option<String>,
}

/// A stored visit as returned in the `recent` section of a report
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecentVisit {
    pub ip: Option<String>,
    pub country: Option<String>,
    pub device: String,
    pub browser: Option<String>,
    pub referrer: Option<String>,
    pub created_at: i64,
}

/// Visit count for one value of a grouping dimension; `dimension` is NULL
/// for visits where the value could not be derived
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DimensionCount {
    pub dimension: Option<String>,
    pub count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub info: ShortLink,
    pub by_country: Vec<DimensionCount>,
    pub by_device: Vec<DimensionCount>,
    pub by_referrer: Vec<DimensionCount>,
    pub recent: Vec<RecentVisit>,
}
