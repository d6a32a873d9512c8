use axum::{
    extract::{ConnectInfo, Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tracing::warn;

use crate::analytics::{extract_client_ip, user_agent, GeoIpService, NewVisit};
use crate::storage::Storage;

pub struct RedirectState {
    pub storage: Arc<dyn Storage>,
    pub geoip: Arc<GeoIpService>,
}

/// Redirect to the stored destination, counting the click and recording
/// the visit
pub async fn follow_link(
    State(state): State<Arc<RedirectState>>,
    Path(short_id): Path<String>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Response {
    let link = match state.storage.get(&short_id).await {
        Ok(Some(link)) => link,
        Ok(None) => return (StatusCode::NOT_FOUND, "Short URL not found").into_response(),
        Err(err) => {
            tracing::error!(short_id = %short_id, error = %err, "lookup failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response();
        }
    };

    // The click is counted as soon as the destination is found; the visit
    // insert below must not be able to undo or block the redirect
    if let Err(err) = state.storage.increment_clicks(&short_id).await {
        tracing::error!(short_id = %short_id, error = %err, "click increment failed");
        return (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response();
    }

    if let Err(err) = record_visit(&state, &short_id, &headers, addr.ip()).await {
        warn!(short_id = %short_id, error = %err, "failed to record visit");
    }

    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, link.long_url)],
    )
        .into_response()
}

async fn record_visit(
    state: &RedirectState,
    short_id: &str,
    headers: &HeaderMap,
    peer: IpAddr,
) -> anyhow::Result<()> {
    let ip = extract_client_ip(headers, peer);
    let country = state.geoip.country_code(ip);

    let ua = headers
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok());
    let client = user_agent::classify(ua.unwrap_or_default());

    let referrer = headers
        .get(header::REFERER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);

    let visit = NewVisit {
        short_id: short_id.to_string(),
        ip: Some(ip.to_string()),
        country,
        user_agent: ua.map(str::to_string),
        device: client.device,
        browser: client.browser,
        referrer,
    };

    state.storage.record_visit(&visit).await
}
