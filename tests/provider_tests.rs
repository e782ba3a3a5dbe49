use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use fuelroute::services::google_maps::GoogleDirectionsClient;
use fuelroute::services::openrouteservice::OrsClient;
use fuelroute::services::routing_provider::RoutingProvider;
use fuelroute::AppError;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

mod common;

// (38.5,-120.2) -> (40.7,-120.95) -> (43.252,-126.453)
const SAMPLE_POLYLINE: &str = "_p~iF~ps|U_ulLnnqC_mqNvxq`@";

async fn ors_geocode(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("ors-test-key") {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": "Access to this API has been disallowed"})),
        );
    }

    let text = params.get("text").map(String::as_str).unwrap_or("");
    let features = match text {
        "Sacramento, CA" => json!([{"geometry": {"type": "Point", "coordinates": [-120.2, 38.5]}}]),
        "Eugene, OR" => json!([{"geometry": {"type": "Point", "coordinates": [-126.453, 43.252]}}]),
        _ => json!([]),
    };
    (
        StatusCode::OK,
        Json(json!({"type": "FeatureCollection", "features": features})),
    )
}

async fn ors_directions(Json(body): Json<Value>) -> Json<Value> {
    assert_eq!(body["coordinates"][0][0], -120.2);
    assert_eq!(body["coordinates"][1][1], 43.252);
    Json(json!({
        "routes": [{
            "summary": {"distance": 804670.0, "duration": 30000.0},
            "geometry": SAMPLE_POLYLINE
        }]
    }))
}

fn ors_stub() -> Router {
    Router::new()
        .route("/geocode/search", get(ors_geocode))
        .route("/v2/directions/driving-car/json", post(ors_directions))
}

fn ors_client(base_url: String, key: &str) -> OrsClient {
    OrsClient::with_config(key.to_string(), base_url, Duration::from_secs(5))
}

#[tokio::test]
async fn test_ors_route() {
    let base_url = common::spawn_stub(ors_stub()).await;
    let client = ors_client(base_url, "ors-test-key");

    let route = client.get_route("Sacramento, CA", "Eugene, OR").await.unwrap();

    assert_eq!(route.points.len(), 3);
    assert!((route.points[1].lat - 40.7).abs() < 1e-9);
    // 804670 m = 500 miles
    assert_eq!(route.total_distance_miles, 500.0);
    assert_eq!(client.provider_name(), "openrouteservice");
}

#[tokio::test]
async fn test_ors_unknown_location() {
    let base_url = common::spawn_stub(ors_stub()).await;
    let client = ors_client(base_url, "ors-test-key");

    let result = client.get_route("Atlantis", "Eugene, OR").await;
    assert!(matches!(result, Err(AppError::LocationNotFound(_))));
}

#[tokio::test]
async fn test_ors_rejected_key() {
    let base_url = common::spawn_stub(ors_stub()).await;
    let client = ors_client(base_url, "wrong-key");

    match client.geocode("Sacramento, CA").await {
        Err(AppError::RoutingApi(msg)) => assert!(msg.contains("403"), "{}", msg),
        other => panic!("expected routing error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_ors_empty_routes() {
    let stub = Router::new()
        .route("/geocode/search", get(ors_geocode))
        .route(
            "/v2/directions/driving-car/json",
            post(|| async { Json(json!({"routes": []})) }),
        );
    let base_url = common::spawn_stub(stub).await;
    let client = ors_client(base_url, "ors-test-key");

    match client.get_route("Sacramento, CA", "Eugene, OR").await {
        Err(AppError::RoutingApi(msg)) => assert_eq!(msg, "No routes found"),
        other => panic!("expected routing error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_ors_unreachable_server() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = ors_client(base_url, "ors-test-key");
    let result = client.geocode("Sacramento, CA").await;
    assert!(matches!(result, Err(AppError::RoutingApi(_))));
}

async fn google_directions(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    if params.get("key").map(String::as_str) != Some("g-test-key") {
        return Json(json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid.",
            "routes": []
        }));
    }
    if params.get("origin").map(String::as_str) == Some("Atlantis") {
        return Json(json!({"status": "NOT_FOUND", "routes": []}));
    }

    Json(json!({
        "status": "OK",
        "routes": [{
            "legs": [{
                "distance": {"text": "300 mi", "value": 482802.0},
                "steps": [
                    {"polyline": {"points": SAMPLE_POLYLINE}},
                    {"polyline": {"points": SAMPLE_POLYLINE}}
                ]
            }]
        }]
    }))
}

fn google_client(base_url: String, key: &str) -> GoogleDirectionsClient {
    GoogleDirectionsClient::with_config(
        key.to_string(),
        format!("{}/maps/api/directions/json", base_url),
        Duration::from_secs(5),
    )
}

fn google_stub() -> Router {
    Router::new().route("/maps/api/directions/json", get(google_directions))
}

#[tokio::test]
async fn test_google_route() {
    let base_url = common::spawn_stub(google_stub()).await;
    let client = google_client(base_url, "g-test-key");

    let route = client
        .get_route("Sacramento, CA", "Eugene, OR")
        .await
        .unwrap();

    // Second step restarts at the first point, so nothing is merged
    assert_eq!(route.points.len(), 6);
    assert_eq!(route.total_distance_miles, 300.0);
    assert_eq!(client.provider_name(), "google");
}

#[tokio::test]
async fn test_google_not_found() {
    let base_url = common::spawn_stub(google_stub()).await;
    let client = google_client(base_url, "g-test-key");

    let result = client.get_route("Atlantis", "Eugene, OR").await;
    assert!(matches!(result, Err(AppError::LocationNotFound(_))));
}

#[tokio::test]
async fn test_google_denied() {
    let base_url = common::spawn_stub(google_stub()).await;
    let client = google_client(base_url, "bad-key");

    match client.get_route("Sacramento, CA", "Eugene, OR").await {
        Err(AppError::RoutingApi(msg)) => assert!(msg.contains("REQUEST_DENIED"), "{}", msg),
        other => panic!("expected routing error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_ors_real_api() {
    if common::should_skip_real_api_tests("ORS_API_KEY") {
        println!("Skipping real API test");
        return;
    }

    let api_key = std::env::var("ORS_API_KEY").unwrap();
    let client = OrsClient::new(api_key);

    let route = client
        .get_route("Oklahoma City, OK", "Amarillo, TX")
        .await
        .expect("OpenRouteService call should succeed");

    assert!(route.points.len() > 10);
    // Roughly 260 road miles
    assert!(
        route.total_distance_miles > 200.0 && route.total_distance_miles < 320.0,
        "Distance should be reasonable: got {}mi",
        route.total_distance_miles
    );
}
