//! Integration tests for the Overpass POI client (wiremock-based)

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use wiremock::matchers::{any, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use domain::{GeoPoint, PoiCategory};
use integration_poi::{
    MOCK_JITTER_DEGREES, OverpassPoiClient, PoiClient, PoiConfig, PoiError, PoiSearch,
};

fn config_for_mock(server_uri: &str) -> PoiConfig {
    PoiConfig {
        endpoint: format!("{server_uri}/api/interpreter"),
        timeout_secs: 5,
        min_request_interval_ms: 0,
        backoff_base_ms: 10,
        ..PoiConfig::default()
    }
}

fn client_for(server: &MockServer) -> OverpassPoiClient {
    OverpassPoiClient::new(&config_for_mock(&server.uri()))
        .unwrap()
        .with_seed(21)
}

const fn sample_elements_json() -> &'static str {
    r#"{
        "version": 0.6,
        "generator": "Overpass API",
        "elements": [
            {
                "type": "node", "id": 2213418521, "lat": 36.1612, "lon": -115.1469,
                "tags": { "amenity": "restaurant", "name": "Heart Attack Grill", "cuisine": "burger" }
            },
            {
                "type": "node", "id": 358219634, "lat": 36.1725, "lon": -115.1221,
                "tags": { "amenity": "fuel", "brand": "Shell" }
            },
            {
                "type": "node", "id": 6110294587, "lat": 36.1447, "lon": -115.1561,
                "tags": {
                    "tourism": "museum",
                    "name": "The Neon Museum",
                    "website": "https://www.neonmuseum.org",
                    "description": "Retired Las Vegas signs"
                }
            }
        ]
    }"#
}

/// Returns 429 for the first `failures` requests, then the sample
/// elements, recording when each request arrived
struct RateLimitedThenOk {
    failures: usize,
    calls: AtomicUsize,
    arrivals: Arc<parking_lot::Mutex<Vec<Instant>>>,
}

impl RateLimitedThenOk {
    fn new(failures: usize) -> (Self, Arc<parking_lot::Mutex<Vec<Instant>>>) {
        let arrivals = Arc::new(parking_lot::Mutex::new(Vec::new()));
        (
            Self {
                failures,
                calls: AtomicUsize::new(0),
                arrivals: Arc::clone(&arrivals),
            },
            arrivals,
        )
    }
}

impl Respond for RateLimitedThenOk {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        self.arrivals.lock().push(Instant::now());
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
            ResponseTemplate::new(429).set_body_string("rate_limited")
        } else {
            ResponseTemplate::new(200).set_body_string(sample_elements_json())
        }
    }
}

fn assert_mock_results(pois: &[domain::PointOfInterest], center: &GeoPoint, categories: &[PoiCategory]) {
    assert_eq!(pois.len(), 3 * categories.len());
    for poi in pois {
        assert!((poi.lat - center.lat()).abs() <= MOCK_JITTER_DEGREES);
        assert!((poi.lng - center.lng()).abs() <= MOCK_JITTER_DEGREES);
        assert!(categories.contains(&poi.category));
        assert!(poi.id.starts_with("poi_"));
    }
}

// ============================================================================
// discover_pois
// ============================================================================

#[tokio::test]
async fn discover_pois_maps_overpass_elements() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/interpreter"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("data=%5Bout%3Ajson%5D%5Btimeout%3A25%5D"))
        .and(body_string_contains("around%3A10000%2C36.1699%2C-115.1398"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_elements_json()))
        .expect(1)
        .mount(&server)
        .await;

    let pois = client_for(&server)
        .discover_pois(&PoiSearch::around(GeoPoint::las_vegas()))
        .await
        .unwrap();

    assert_eq!(pois.len(), 3);

    assert_eq!(pois[0].id, "2213418521");
    assert_eq!(pois[0].name, "Heart Attack Grill");
    assert_eq!(pois[0].category, PoiCategory::Dining);

    assert_eq!(pois[1].name, "Unnamed POI");
    assert_eq!(pois[1].category, PoiCategory::Fuel);
    assert!(pois[1].website.is_none());

    assert_eq!(pois[2].category, PoiCategory::Attraction);
    assert_eq!(pois[2].website.as_deref(), Some("https://www.neonmuseum.org"));
    assert_eq!(pois[2].description.as_deref(), Some("Retired Las Vegas signs"));

    for poi in &pois {
        let rating = poi.rating.unwrap();
        assert!((3.0..=5.0).contains(&rating));
    }
}

#[tokio::test]
async fn discover_pois_queries_only_requested_categories() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("%22amenity%22%3D%22fuel%22"))
        .and(body_string_contains("%22shop%22%3D%22gas%22"))
        .and(body_string_contains("around%3A2500%2C"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"elements":[]}"#))
        .expect(1)
        .mount(&server)
        .await;

    let search = PoiSearch::around(GeoPoint::phoenix())
        .with_radius(2500)
        .with_categories([PoiCategory::Fuel]);
    let pois = client_for(&server).discover_pois(&search).await.unwrap();

    assert!(pois.is_empty());

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(!body.contains("restaurant"));
    assert!(!body.contains("national_park"));
}

#[tokio::test]
async fn discover_pois_falls_back_on_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(504).set_body_string("Gateway Timeout"))
        .expect(1)
        .mount(&server)
        .await;

    let center = GeoPoint::grand_canyon();
    let categories = [PoiCategory::NationalPark, PoiCategory::Camping];
    let search = PoiSearch::around(center).with_categories(categories);

    let pois = client_for(&server).discover_pois(&search).await.unwrap();

    assert_mock_results(&pois, &center, &categories);
    assert_eq!(pois[0].name, "Red Rock Canyon");
    assert_eq!(pois[3].name, "Desert Oasis Campground");
}

#[tokio::test]
async fn discover_pois_falls_back_when_unreachable() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = OverpassPoiClient::new(&config_for_mock(&uri)).unwrap();
    let center = GeoPoint::las_vegas();

    let pois = client
        .discover_pois(&PoiSearch::around(center))
        .await
        .unwrap();

    assert_mock_results(&pois, &center, &PoiCategory::DEFAULT_SEARCH);
}

#[tokio::test]
async fn discover_pois_falls_back_on_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<?xml version=\"1.0\"?><osm></osm>"),
        )
        .mount(&server)
        .await;

    let center = GeoPoint::phoenix();
    let search = PoiSearch::around(center).with_categories([PoiCategory::Lodging]);
    let pois = client_for(&server).discover_pois(&search).await.unwrap();

    assert_mock_results(&pois, &center, &[PoiCategory::Lodging]);
}

#[tokio::test]
async fn discover_pois_rejects_zero_radius_without_request() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let search = PoiSearch::around(GeoPoint::las_vegas()).with_radius(0);
    let err = client_for(&server).discover_pois(&search).await.unwrap_err();
    assert!(matches!(err, PoiError::Validation(_)));
}

#[tokio::test]
async fn discover_pois_with_no_categories_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let search = PoiSearch::around(GeoPoint::las_vegas()).with_categories([]);
    let pois = client_for(&server).discover_pois(&search).await.unwrap();
    assert!(pois.is_empty());
}

// ============================================================================
// Rate limiting and retry
// ============================================================================

#[tokio::test]
async fn rate_limited_queries_are_retried_with_backoff() {
    let server = MockServer::start().await;
    let (responder, arrivals) = RateLimitedThenOk::new(2);

    Mock::given(method("POST"))
        .respond_with(responder)
        .expect(3)
        .mount(&server)
        .await;

    let config = PoiConfig {
        backoff_base_ms: 50,
        ..config_for_mock(&server.uri())
    };
    let client = OverpassPoiClient::new(&config).unwrap();

    let pois = client
        .request_pois(&GeoPoint::las_vegas(), 10_000, &[PoiCategory::Dining])
        .await
        .unwrap();
    assert_eq!(pois.len(), 3);

    let arrivals = arrivals.lock().clone();
    assert_eq!(arrivals.len(), 3);
    assert!(arrivals[1] - arrivals[0] >= Duration::from_millis(100));
    assert!(arrivals[2] - arrivals[0] >= Duration::from_millis(200));
}

#[tokio::test]
async fn persistent_rate_limit_gives_up_after_ceiling() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
        .expect(4)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .request_pois(&GeoPoint::las_vegas(), 10_000, &[PoiCategory::Dining])
        .await
        .unwrap_err();
    assert!(err.is_rate_limited());
    assert!(err.to_string().contains("Too Many Requests"));
}

#[tokio::test]
async fn persistent_rate_limit_still_yields_pois() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .expect(4)
        .mount(&server)
        .await;

    let center = GeoPoint::las_vegas();
    let search = PoiSearch::around(center).with_categories([PoiCategory::Fuel]);
    let pois = client_for(&server).discover_pois(&search).await.unwrap();

    assert_mock_results(&pois, &center, &[PoiCategory::Fuel]);
}

#[tokio::test]
async fn bad_request_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("parse error"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .request_pois(&GeoPoint::las_vegas(), 10_000, &[PoiCategory::Dining])
        .await
        .unwrap_err();
    assert!(matches!(err, PoiError::Provider { status: 400, .. }));
}

#[tokio::test]
async fn consecutive_queries_respect_min_interval() {
    let server = MockServer::start().await;
    let (responder, arrivals) = RateLimitedThenOk::new(0);

    Mock::given(method("POST"))
        .respond_with(responder)
        .expect(2)
        .mount(&server)
        .await;

    let config = PoiConfig {
        min_request_interval_ms: 120,
        ..config_for_mock(&server.uri())
    };
    let client = OverpassPoiClient::new(&config).unwrap();
    let search = PoiSearch::around(GeoPoint::las_vegas());

    // Timed from the caller: the first connect can delay the first arrival
    let started = Instant::now();
    client.discover_pois(&search).await.unwrap();
    client.discover_pois(&search).await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(120));
    assert_eq!(arrivals.lock().len(), 2);
}
