use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One alias → destination mapping, as stored in the `urls` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShortLink {
    pub id: i64,
    pub short_id: String,
    pub long_url: String,
    pub clicks: i64,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
    pub custom: Option<String>,
}

/// Response for a shorten call. `clicks` and `created_at` are only present
/// when an existing mapping for the same long URL is returned.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_id: String,
    pub short_url: String,
    pub long_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clicks: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub short: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub short_id: String,
    pub short_url: String,
}
