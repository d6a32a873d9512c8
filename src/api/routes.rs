use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::{self, Next},
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::auth::{admin_middleware, AdminAuth};
use crate::shortener::Shortener;
use crate::storage::Storage;

use super::handlers::{
    generate, health_check, link_analytics, link_info, resolve, shorten, AppState,
};

pub fn create_api_router(
    shortener: Shortener,
    storage: Arc<dyn Storage>,
    auth: Arc<AdminAuth>,
) -> Router {
    let state = Arc::new(AppState { shortener, storage });

    let protected = Router::new()
        .route("/analytics/{id}", get(link_analytics))
        .route_layer(middleware::from_fn(
            move |headers: HeaderMap, request: Request, next: Next| {
                let auth = Arc::clone(&auth);
                admin_middleware(auth, headers, request, next)
            },
        ))
        .with_state(Arc::clone(&state));

    Router::new()
        .route("/health", get(health_check))
        .route("/shorten", post(shorten))
        .route("/generate", get(generate))
        .route("/resolve", post(resolve))
        .route("/info/{id}", get(link_info))
        .with_state(state)
        .merge(protected)
}
