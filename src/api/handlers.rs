use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::analytics::AnalyticsReport;
use crate::error::ServiceError;
use crate::models::{GenerateResponse, ResolveRequest, ShortLink, ShortenRequest, ShortenResponse};
use crate::shortener::Shortener;
use crate::storage::Storage;

pub struct AppState {
    pub shortener: Shortener,
    pub storage: Arc<dyn Storage>,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

/// Grouped dimensions returned per report
const TOP_DIMENSIONS: i64 = 10;

/// Raw visits returned per report
const RECENT_VISITS: i64 = 100;

/// Create (or return) a short alias for a URL
pub async fn shorten(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, ServiceError> {
    // An empty custom field means "no custom alias"
    let custom = payload.custom.as_deref().filter(|c| !c.is_empty());
    let response = state.shortener.shorten(&payload.url, custom).await?;
    Ok(Json(response))
}

/// Probe for an unused alias without creating a mapping
pub async fn generate(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GenerateResponse>, ServiceError> {
    let response = state.shortener.generate_unused().await?;
    Ok(Json(response))
}

/// Look up a mapping from an alias or full short URL, without counting a visit
pub async fn resolve(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ResolveRequest>,
) -> Result<Json<ShortLink>, ServiceError> {
    let link = state.shortener.resolve(&payload.short).await?;
    Ok(Json(link))
}

/// Raw mapping record for an alias
pub async fn link_info(
    State(state): State<Arc<AppState>>,
    Path(short_id): Path<String>,
) -> Result<Json<ShortLink>, ServiceError> {
    let link = state.shortener.lookup(&short_id).await?;
    Ok(Json(link))
}

/// Full analytics report for an alias. Admin-gated in the router.
pub async fn link_analytics(
    State(state): State<Arc<AppState>>,
    Path(short_id): Path<String>,
) -> Result<Json<AnalyticsReport>, ServiceError> {
    let info = state.shortener.lookup(&short_id).await?;

    let by_country = state
        .storage
        .counts_by_country(&short_id, TOP_DIMENSIONS)
        .await?;
    let by_device = state.storage.counts_by_device(&short_id).await?;
    let by_referrer = state
        .storage
        .counts_by_referrer(&short_id, TOP_DIMENSIONS)
        .await?;
    let recent = state.storage.recent_visits(&short_id, RECENT_VISITS).await?;

    Ok(Json(AnalyticsReport {
        info,
        by_country,
        by_device,
        by_referrer,
        recent,
    }))
}

/// Health check endpoint
pub async fn health_check() -> Json<SuccessResponse> {
    Json(SuccessResponse {
        message: "OK".to_string(),
    })
}
