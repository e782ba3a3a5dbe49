use async_trait::async_trait;
use fuelroute::cache::PlanCache;
use fuelroute::config::FuelPlannerConfig;
use fuelroute::models::{Coordinates, Route};
use fuelroute::services::fuel_planner::FuelPlanner;
use fuelroute::services::routing_provider::RoutingProvider;
use fuelroute::services::station_snapping::StationSnapper;
use fuelroute::services::trip_planner::TripPlanner;
use fuelroute::stations::StationIndex;
use fuelroute::{AppError, AppState, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Stations along 38N, the interstate corridor used by [`corridor_route`]
#[allow(dead_code)]
pub const CORRIDOR_CSV: &str = "\
OPIS Truckstop ID,Truckstop Name,Address,City,State,Rack ID,Retail Price,latitude,longitude
101,PILOT TRAVEL CENTER #1,\"I-70, EXIT 1\",Goodland,KS,307,3.459,38.02,-107.0
102,LOVES #2,\"I-70, EXIT 2\",Colby,KS,307,3.199,37.99,-104.0
103,TA #3,\"I-70, EXIT 3\",Hays,KS,307,3.389,38.01,-101.0
104,FLYING J #4,\"I-70, EXIT 4\",Salina,KS,307,3.099,38.00,-98.0
105,CASEYS #5,\"US-56 & MAIN\",Far Away,KS,307,2.499,39.50,-101.0
106,NO COORDS #6,\"I-70, EXIT 6\",Nowhere,KS,307,3.000,,
";

/// ~817 mile drive along 38N with points every half degree
#[allow(dead_code)]
pub fn corridor_route() -> Route {
    let points = (0..=30)
        .map(|i| Coordinates::new(38.0, -110.0 + i as f64 * 0.5).unwrap())
        .collect();
    Route::new(points, 820.0)
}

/// Routing provider returning a fixed route and counting calls
#[allow(dead_code)]
pub struct FakeProvider {
    route: Option<Route>,
    pub calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeProvider {
    pub fn new(route: Route) -> Self {
        FakeProvider {
            route: Some(route),
            calls: AtomicUsize::new(0),
        }
    }

    /// Provider that cannot resolve any location
    pub fn not_found() -> Self {
        FakeProvider {
            route: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RoutingProvider for FakeProvider {
    async fn get_route(&self, start: &str, _end: &str) -> Result<Route> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.route
            .clone()
            .ok_or_else(|| AppError::LocationNotFound(format!("Could not find location '{}'", start)))
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

/// Build the planner over [`CORRIDOR_CSV`]
#[allow(dead_code)]
pub fn build_trip_planner(provider: Arc<dyn RoutingProvider>) -> TripPlanner {
    let config = FuelPlannerConfig::default();
    let index = StationIndex::from_reader(CORRIDOR_CSV.as_bytes()).unwrap();
    TripPlanner::new(
        provider,
        StationSnapper::new(Arc::new(index), &config),
        FuelPlanner::new(config),
    )
}

/// Router as mounted under /api/v1, without the outer layers
#[allow(dead_code)]
pub fn build_test_app(
    provider: Arc<dyn RoutingProvider>,
    cache: Option<Arc<dyn PlanCache>>,
) -> axum::Router {
    let state = Arc::new(AppState {
        trip_planner: build_trip_planner(provider),
        cache,
    });
    fuelroute::routes::create_router(state)
}

/// Serve `router` on an ephemeral local port and return its base URL
#[allow(dead_code)]
pub async fn spawn_stub(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub server");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Check if we should skip real API tests
#[allow(dead_code)]
pub fn should_skip_real_api_tests(key_var: &str) -> bool {
    std::env::var("SKIP_REAL_API_TESTS").is_ok() || std::env::var(key_var).is_err()
}
