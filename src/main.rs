use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use curtail::analytics::GeoIpService;
use curtail::api;
use curtail::auth::AdminAuth;
use curtail::config::Config;
use curtail::redirect;
use curtail::shortener::Shortener;
use curtail::storage::{SqliteStorage, Storage};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Initialize storage
    info!("Using SQLite storage: {}", config.database.url);
    let storage: Arc<dyn Storage> = Arc::new(
        SqliteStorage::new(&config.database.url, config.database.max_connections).await?,
    );
    storage.init().await?;
    info!("Database initialized successfully");

    // GeoIP country lookups are best-effort and entirely optional
    let geoip = Arc::new(GeoIpService::new(config.geoip_db_path.as_deref())?);
    match config.geoip_db_path.as_deref() {
        Some(path) => info!("GeoIP country lookups enabled from {}", path),
        None => info!("GEOIP_DB_PATH not set, visit country will be recorded as unknown"),
    }

    let auth = Arc::new(AdminAuth::new(config.admin_token.clone()));
    if config.admin_token.is_none() {
        info!("ADMIN_TOKEN not set, analytics endpoints always respond 403");
    }

    let shortener = Shortener::new(Arc::clone(&storage), config.base_url.clone());

    // One listener serves both the JSON API and the redirect path
    let app = axum::Router::new()
        .nest(
            "/api",
            api::create_api_router(shortener, Arc::clone(&storage), auth),
        )
        .merge(redirect::create_redirect_router(
            Arc::clone(&storage),
            geoip,
        ))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Listening on http://{}", addr);
    info!("   - Short links resolve from {}/<id>", config.base_url);
    info!("   - API endpoints available at http://{}/api/...", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
