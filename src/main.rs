use axum::Router;
use fuelroute::cache::{MemoryCacheService, PlanCache, RedisCacheService};
use fuelroute::config::{Config, RoutingProviderKind};
use fuelroute::constants::{
    DEFAULT_GOOGLE_DIRECTIONS_URL, DEFAULT_MEMORY_CACHE_MAX_ENTRIES, DEFAULT_ORS_BASE_URL,
};
use fuelroute::services::fuel_planner::FuelPlanner;
use fuelroute::services::google_maps::GoogleDirectionsClient;
use fuelroute::services::openrouteservice::OrsClient;
use fuelroute::services::routing_provider::RoutingProvider;
use fuelroute::services::station_snapping::StationSnapper;
use fuelroute::services::trip_planner::TripPlanner;
use fuelroute::stations::StationIndex;
use fuelroute::AppState;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fuelroute=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting fuel route API server");
    tracing::info!(
        provider = ?config.routing_provider,
        tank_range_miles = config.fuel_planner.tank_range_miles,
        mpg = config.fuel_planner.miles_per_gallon,
        tank_gallons = config.fuel_planner.tank_capacity_gallons(),
        "Configuration loaded successfully"
    );

    // Load station prices once; the index is read-only afterwards
    tracing::info!("Loading fuel stations from {}...", config.fuel_prices_csv);
    let index = Arc::new(StationIndex::from_path(Path::new(&config.fuel_prices_csv))?);

    // Plan cache is opt-in: Redis when configured, otherwise in-memory
    let cache: Option<Arc<dyn PlanCache>> = match config.plan_cache_ttl_seconds() {
        None => {
            tracing::info!("Plan cache disabled. Set REDIS_URL or PLAN_CACHE_TTL to enable.");
            None
        }
        Some(ttl) => Some(match config.redis_url {
            Some(ref redis_url) => {
                tracing::info!("Connecting to Redis cache...");
                match RedisCacheService::new(redis_url, ttl).await {
                    Ok(redis_cache) => Arc::new(redis_cache) as Arc<dyn PlanCache>,
                    Err(e) => {
                        tracing::warn!(
                            "Failed to connect to Redis: {}. Falling back to in-memory cache.",
                            e
                        );
                        Arc::new(MemoryCacheService::new(ttl, DEFAULT_MEMORY_CACHE_MAX_ENTRIES))
                    }
                }
            }
            None => {
                tracing::info!("Using in-memory plan cache (TTL {}s)", ttl);
                Arc::new(MemoryCacheService::new(ttl, DEFAULT_MEMORY_CACHE_MAX_ENTRIES))
            }
        }),
    };

    // Initialize services
    let provider = routing_provider(&config);
    let snapper = StationSnapper::new(index, &config.fuel_planner);
    let fuel_planner = FuelPlanner::new(config.fuel_planner.clone());
    let trip_planner = TripPlanner::new(provider, snapper, fuel_planner);

    // Create application state
    let state = Arc::new(AppState {
        trip_planner,
        cache,
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", fuelroute::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn routing_provider(config: &Config) -> Arc<dyn RoutingProvider> {
    let api_key = config.routing_api_key.clone();
    let timeout = Duration::from_secs(config.routing_timeout_seconds);

    match config.routing_provider {
        RoutingProviderKind::OpenRouteService => {
            let base_url = config
                .routing_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_ORS_BASE_URL.to_string());
            Arc::new(OrsClient::with_config(api_key, base_url, timeout))
        }
        RoutingProviderKind::GoogleMaps => {
            let base_url = config
                .routing_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_GOOGLE_DIRECTIONS_URL.to_string());
            Arc::new(GoogleDirectionsClient::with_config(api_key, base_url, timeout))
        }
    }
}
