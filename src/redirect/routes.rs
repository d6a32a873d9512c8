use axum::{routing::get, Router};
use std::sync::Arc;

use crate::analytics::GeoIpService;
use crate::storage::Storage;

use super::handlers::{follow_link, RedirectState};

pub fn create_redirect_router(storage: Arc<dyn Storage>, geoip: Arc<GeoIpService>) -> Router {
    let state = Arc::new(RedirectState { storage, geoip });

    Router::new()
        .route("/{id}", get(follow_link))
        .with_state(state)
}
