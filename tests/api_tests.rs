use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt;
use trip_planner_rs::{
    build_router,
    services::{StructuredRequest, TextGenerator},
    AppState, GenerationError, MemoryTripStore, TripPlanner,
};

const ALICE: &str = "alice@example.com";
const BOB: &str = "bob@example.com";

struct CountingText {
    calls: AtomicUsize,
    reply: Result<String, GenerationError>,
}

#[async_trait]
impl TextGenerator for CountingText {
    async fn generate_json(&self, request: &StructuredRequest) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(request.prompt.contains("Destination:"));
        self.reply.clone()
    }
}

fn itinerary(days: u32) -> String {
    let daily: Vec<Value> = (1..=days)
        .map(|day| {
            json!({
                "day": day,
                "theme": "Old town",
                "activities": [{
                    "time": "Morning",
                    "description": "Coffee",
                    "placeName": "Cafe Central, Vienna"
                }]
            })
        })
        .collect();

    json!({
        "tripName": "Viennese Days",
        "overview": "Coffee houses and palaces",
        "estimatedLocalTravelCharges": "₹2000 - ₹3000",
        "proTips": ["Get a Wiener Linien ticket"],
        "dailyItinerary": daily,
        "accommodations": {
            "hotels": [{
                "name": "Hotel Sacher",
                "description": "Classic",
                "priceRange": "₹30000",
                "googleMapsLink": ""
            }],
            "hostels": [{
                "name": "Wombat's",
                "description": "Social",
                "priceRange": "₹2500",
                "googleMapsLink": ""
            }]
        }
    })
    .to_string()
}

fn setup_app(reply: Result<String, GenerationError>) -> (Router, Arc<CountingText>) {
    let text = Arc::new(CountingText {
        calls: AtomicUsize::new(0),
        reply,
    });
    let state = AppState::new(
        TripPlanner::new(text.clone()),
        Arc::new(MemoryTripStore::new()),
    );
    (build_router(state), text)
}

fn vienna_request() -> Value {
    json!({
        "destination": "Vienna",
        "groupType": "friends",
        "numberOfPeople": 3,
        "days": 2,
        "budget": "Medium"
    })
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(email) = user {
        builder = builder.header("x-user-email", email);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn health_is_open() {
    let (app, _) = setup_app(Ok(itinerary(2)));
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn generate_without_identity_is_unauthorized() {
    let (app, text) = setup_app(Ok(itinerary(2)));
    let (status, body) = send(
        &app,
        Method::POST,
        "/generate-trip",
        None,
        Some(vienna_request()),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
    assert_eq!(text.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_fields_are_rejected_before_generation() {
    let (app, text) = setup_app(Ok(itinerary(2)));
    let mut request = vienna_request();
    request.as_object_mut().unwrap().remove("days");

    let (status, body) = send(
        &app,
        Method::POST,
        "/generate-trip",
        Some(ALICE),
        Some(request),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("days"));
    assert_eq!(text.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn generation_failure_is_a_server_error() {
    let (app, _) = setup_app(Ok("not json at all".to_string()));
    let (status, body) = send(
        &app,
        Method::POST,
        "/generate-trip",
        Some(ALICE),
        Some(vienna_request()),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("Server error: "));

    let (status, _) = send(&app, Method::GET, "/trips", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_list_get_and_delete_trip() {
    let (app, text) = setup_app(Ok(itinerary(2)));

    let (status, created) = send(
        &app,
        Method::POST,
        "/generate-trip",
        Some(ALICE),
        Some(vienna_request()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text.calls.load(Ordering::SeqCst), 1);
    assert_eq!(created["destination"], "Vienna");
    assert_eq!(created["groupType"], "friends");
    assert_eq!(created["numberOfPeople"], 3);
    assert_eq!(created["days"], 2);
    assert_eq!(created["result"]["tripName"], "Viennese Days");
    assert_eq!(created["result"]["inputDetails"]["budget"], "Medium");
    assert_eq!(
        created["result"]["accommodations"]["hotels"][0]["googleMapsLink"],
        "https://www.google.com/maps/search/Hotel+Sacher+Vienna"
    );
    let id = created["id"].as_str().unwrap().to_string();

    let (status, listed) = send(&app, Method::GET, "/trips", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], id.as_str());

    let (status, fetched) = send(
        &app,
        Method::GET,
        &format!("/trips/{id}"),
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/trips/{id}"),
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Trip deleted successfully");

    let (status, _) = send(&app, Method::GET, &format!("/trips/{id}"), Some(ALICE), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, listed) = send(&app, Method::GET, "/trips", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn listing_is_newest_first() {
    let (app, _) = setup_app(Ok(itinerary(2)));

    let (_, first) = send(
        &app,
        Method::POST,
        "/generate-trip",
        Some(ALICE),
        Some(vienna_request()),
    )
    .await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let (_, second) = send(
        &app,
        Method::POST,
        "/generate-trip",
        Some(ALICE),
        Some(vienna_request()),
    )
    .await;

    let (_, listed) = send(&app, Method::GET, "/trips", Some(ALICE), None).await;
    assert_eq!(listed[0]["id"], second["id"]);
    assert_eq!(listed[1]["id"], first["id"]);
}

#[tokio::test]
async fn unknown_or_malformed_trip_ids_are_not_found() {
    let (app, _) = setup_app(Ok(itinerary(2)));

    let (status, body) = send(
        &app,
        Method::GET,
        "/trips/7a4ec3a4-3b4b-4a77-9a5e-1f0c2d5e8b11",
        Some(ALICE),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Trip not found");

    let (status, _) = send(&app, Method::GET, "/trips/not-a-uuid", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_the_owner_may_delete() {
    let (app, _) = setup_app(Ok(itinerary(2)));
    let (_, created) = send(
        &app,
        Method::POST,
        "/generate-trip",
        Some(ALICE),
        Some(vienna_request()),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::DELETE, &format!("/trips/{id}"), Some(BOB), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Trip not found or access denied");

    let (status, _) = send(&app, Method::GET, &format!("/trips/{id}"), Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::DELETE, "/trips/not-a-uuid", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_user_has_no_trip_list() {
    let (app, _) = setup_app(Ok(itinerary(2)));
    let (status, body) = send(&app, Method::GET, "/trips", Some(BOB), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn every_trip_route_requires_identity() {
    let (app, _) = setup_app(Ok(itinerary(2)));
    let id = "7a4ec3a4-3b4b-4a77-9a5e-1f0c2d5e8b11";

    for (method, uri) in [
        (Method::GET, "/trips".to_string()),
        (Method::GET, format!("/trips/{id}")),
        (Method::DELETE, format!("/trips/{id}")),
    ] {
        let (status, _) = send(&app, method.clone(), &uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
}

#[tokio::test]
async fn numeric_budget_is_accepted_and_kept_as_text() {
    let (app, text) = setup_app(Ok(itinerary(2)));
    let request = json!({
        "destination": "Goa",
        "groupType": "friends",
        "numberOfPeople": 3,
        "days": 2,
        "budget": 50000
    });

    let (status, created) = send(
        &app,
        Method::POST,
        "/generate-trip",
        Some(ALICE),
        Some(request),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{created}");
    assert_eq!(text.calls.load(Ordering::SeqCst), 1);
    assert_eq!(created["budget"], "50000");
    assert_eq!(created["result"]["inputDetails"]["budget"], "50000");
}
