use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use harvest_map::config::Settings;
use harvest_map::core::{Catalog, MarkerLayout};
use harvest_map::routes::{self, AppState};
use harvest_map::services::{MarketplaceClient, ProductCache};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // HARVEST_CONFIG points at a single config file in place of config/
    let settings = match std::env::var("HARVEST_CONFIG") {
        Ok(path) => Settings::load_from(path),
        Err(_) => Settings::load(),
    }
    .map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting Harvest Map service...");

    let timeout = Duration::from_secs(settings.backend.timeout_secs.unwrap_or(15));
    let backend = Arc::new(
        MarketplaceClient::new(settings.backend.base_url.clone(), timeout).map_err(|e| {
            tracing::error!("Failed to create backend client: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e)
        })?,
    );

    info!("Backend client initialized ({})", backend.base_url());

    let cache_ttl = settings.cache.ttl_secs.unwrap_or(30);
    let cache_capacity = settings.cache.capacity.unwrap_or(256);
    let cache = ProductCache::new(cache_capacity, cache_ttl);

    info!("Product cache initialized ({} entries, TTL: {}s)", cache_capacity, cache_ttl);

    let layout = MarkerLayout::from(&settings.markers);
    let catalog = Catalog::new(layout);

    info!("Catalog initialized with marker layout: {:?}", layout);

    let app_state = AppState {
        backend,
        cache,
        catalog,
        filtering: settings.filtering.clone(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);
    let json_limit = settings.server.json_limit_bytes;

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(|cfg| routes::configure_app(cfg, json_limit))
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
