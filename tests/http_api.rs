use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{Duration, Local, NaiveDateTime, NaiveTime, Utc};
use serde_json::{json, Value};
use ulid::Ulid;

use atrium::engine::Engine;
use atrium::http;
use atrium::model::*;
use atrium::store::MemStore;

fn day(offset: i64) -> NaiveDateTime {
    Local::now().date_naive().and_time(NaiveTime::MIN) + Duration::days(offset)
}

fn fmt(t: NaiveDateTime) -> String {
    t.format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn venue(name: &str, city: &str, capacity: u32, price: f64, rating: Option<f64>) -> Venue {
    Venue {
        id: Ulid::new(),
        name: name.into(),
        description: format!("{name} in {city}"),
        city: city.into(),
        address: "1 Main St".into(),
        capacity,
        price_per_night: price,
        amenities: vec!["wifi".into(), "catering".into()],
        image_url: None,
        rating,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn pending_inquiry(venue_id: Ulid, start_day: i64, end_day: i64) -> BookingInquiry {
    let now = Utc::now();
    BookingInquiry {
        id: Ulid::new(),
        venue_id,
        company_name: "Existing Corp".into(),
        email: "existing@corp.example".into(),
        start_date: day(start_day),
        end_date: day(end_day),
        attendee_count: 10,
        message: None,
        status: InquiryStatus::Pending,
        created_at: now,
        updated_at: now,
    }
}

fn booking_body(venue_id: &str, start_day: i64, end_day: i64, attendees: u32) -> Value {
    json!({
        "venueId": venue_id,
        "companyName": "Acme Corp",
        "email": "events@acme.example",
        "startDate": fmt(day(start_day)),
        "endDate": fmt(day(end_day)),
        "attendeeCount": attendees,
    })
}

fn server(store: Arc<MemStore>) -> TestServer {
    let engine = Arc::new(Engine::new(store));
    TestServer::new(http::router(engine)).unwrap()
}

// ── Venues ───────────────────────────────────────────────

#[tokio::test]
async fn venue_listing_returns_page_envelope() {
    let store = Arc::new(MemStore::new());
    for i in 0..3 {
        store.insert_venue(venue(&format!("Hall {i}"), "Austin", 50, 300.0, None));
    }
    let server = server(store);

    let res = server
        .get("/api/venues")
        .add_query_param("limit", "2")
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);

    let body: Value = res.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"]["page"], json!(1));
    assert_eq!(body["pagination"]["limit"], json!(2));
    assert_eq!(body["pagination"]["total"], json!(3));
    assert_eq!(body["pagination"]["totalPages"], json!(2));
    assert_eq!(body["pagination"]["hasMore"], json!(true));
}

#[tokio::test]
async fn venue_listing_city_filter_is_case_insensitive() {
    let store = Arc::new(MemStore::new());
    store.insert_venue(venue("Grand Hall", "Austin", 50, 300.0, None));
    store.insert_venue(venue("Harbor House", "Boston", 50, 300.0, None));
    let server = server(store);

    let res = server
        .get("/api/venues")
        .add_query_param("city", "austin")
        .await;
    assert_eq!(res.status_code(), StatusCode::OK);

    let body: Value = res.json();
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["city"], json!("Austin"));
}

#[tokio::test]
async fn venue_listing_rejects_bad_query_params() {
    let server = server(Arc::new(MemStore::new()));

    let res = server
        .get("/api/venues")
        .add_query_param("minCapacity", "lots")
        .add_query_param("page", "0")
        .await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = res.json();
    assert_eq!(body["error"], json!("Invalid query parameters"));
    assert!(body["details"]["minCapacity"].is_array());
    assert!(body["details"]["page"].is_array());
}

#[tokio::test]
async fn venue_detail_and_missing_venue() {
    let store = Arc::new(MemStore::new());
    let v = venue("Grand Hall", "Austin", 50, 300.0, Some(4.5));
    let vid = v.id;
    store.insert_venue(v);
    let server = server(store);

    let res = server.get(&format!("/api/venues/{vid}")).await;
    assert_eq!(res.status_code(), StatusCode::OK);
    let body: Value = res.json();
    assert_eq!(body["data"]["name"], json!("Grand Hall"));
    assert_eq!(body["data"]["pricePerNight"], json!(300.0));

    let res = server.get(&format!("/api/venues/{}", Ulid::new())).await;
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    let body: Value = res.json();
    assert_eq!(body["error"], json!("Venue not found"));
}

#[tokio::test]
async fn cities_are_distinct_and_sorted() {
    let store = Arc::new(MemStore::new());
    store.insert_venue(venue("A", "Denver", 10, 100.0, None));
    store.insert_venue(venue("B", "Austin", 10, 100.0, None));
    store.insert_venue(venue("C", "Austin", 10, 100.0, None));
    let server = server(store);

    let res = server.get("/api/cities").await;
    assert_eq!(res.status_code(), StatusCode::OK);
    let body: Value = res.json();
    assert_eq!(body["data"], json!(["Austin", "Denver"]));
}

// ── Booking creation ─────────────────────────────────────

#[tokio::test]
async fn booking_is_created_with_embedded_venue() {
    let store = Arc::new(MemStore::new());
    let v = venue("Grand Hall", "Austin", 50, 300.0, None);
    let vid = v.id;
    store.insert_venue(v);
    let server = server(store);

    let res = server
        .post("/api/bookings")
        .json(&booking_body(&vid.to_string(), 5, 8, 25))
        .await;
    assert_eq!(res.status_code(), StatusCode::CREATED);

    let body: Value = res.json();
    assert_eq!(body["message"], json!("Booking inquiry submitted successfully"));
    assert_eq!(body["data"]["status"], json!("pending"));
    assert_eq!(body["data"]["venueId"], json!(vid.to_string()));
    assert_eq!(body["data"]["venue"]["name"], json!("Grand Hall"));
    assert!(body["data"]["id"].is_string());
}

#[tokio::test]
async fn booking_validation_failure_reports_fields() {
    let server = server(Arc::new(MemStore::new()));

    let res = server
        .post("/api/bookings")
        .json(&json!({
            "venueId": "",
            "companyName": "A",
            "email": "nope",
            "startDate": "2020-01-01",
            "endDate": "garbage",
            "attendeeCount": 0,
        }))
        .await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = res.json();
    assert_eq!(body["error"], json!("Validation failed"));
    for field in ["venueId", "companyName", "email", "startDate", "endDate", "attendeeCount"] {
        assert!(body["details"][field].is_array(), "missing details for {field}");
    }
}

#[tokio::test]
async fn booking_over_capacity_cites_maximum() {
    let store = Arc::new(MemStore::new());
    let v = venue("Grand Hall", "Austin", 50, 300.0, None);
    let vid = v.id;
    store.insert_venue(v);
    let server = server(store);

    let res = server
        .post("/api/bookings")
        .json(&booking_body(&vid.to_string(), 5, 8, 60))
        .await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = res.json();
    assert_eq!(
        body["error"],
        json!("Attendee count (60) exceeds venue capacity (50)")
    );
    assert_eq!(
        body["details"]["attendeeCount"][0],
        json!("Maximum capacity for this venue is 50 attendees")
    );
}

#[tokio::test]
async fn booking_overlap_conflicts_back_to_back_succeeds() {
    let store = Arc::new(MemStore::new());
    let v = venue("Grand Hall", "Austin", 50, 300.0, None);
    let vid = v.id;
    store.insert_venue(v);
    store.insert_inquiry(pending_inquiry(vid, 5, 8));
    let server = server(store);

    // Overlapping span: 409.
    let res = server
        .post("/api/bookings")
        .json(&booking_body(&vid.to_string(), 6, 10, 25))
        .await;
    assert_eq!(res.status_code(), StatusCode::CONFLICT);
    let body: Value = res.json();
    assert_eq!(
        body["error"],
        json!("The venue is not available for the selected dates")
    );
    assert!(body["details"]["dates"].is_array());

    // Starts exactly at the existing end: 201.
    let res = server
        .post("/api/bookings")
        .json(&booking_body(&vid.to_string(), 8, 10, 25))
        .await;
    assert_eq!(res.status_code(), StatusCode::CREATED);
}

#[tokio::test]
async fn booking_for_unknown_venue_is_404() {
    let server = server(Arc::new(MemStore::new()));

    let res = server
        .post("/api/bookings")
        .json(&booking_body(&Ulid::new().to_string(), 5, 8, 10))
        .await;
    assert_eq!(res.status_code(), StatusCode::NOT_FOUND);
    let body: Value = res.json();
    assert_eq!(body["error"], json!("Venue not found"));
}

#[tokio::test]
async fn malformed_json_body_is_rejected() {
    let server = server(Arc::new(MemStore::new()));

    let res = server
        .post("/api/bookings")
        .bytes(axum::body::Bytes::from_static(b"{not json"))
        .content_type("application/json")
        .await;
    assert_eq!(res.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = res.json();
    assert_eq!(body["error"], json!("Invalid JSON in request body"));
}

// ── Administrative listing ───────────────────────────────

#[tokio::test]
async fn bookings_listing_embeds_minimal_venue_newest_first() {
    let store = Arc::new(MemStore::new());
    let v = venue("Grand Hall", "Austin", 50, 300.0, None);
    let vid = v.id;
    store.insert_venue(v);

    let mut older = pending_inquiry(vid, 5, 8);
    older.created_at = Utc::now() - Duration::hours(2);
    let newer = pending_inquiry(vid, 10, 12);
    store.insert_inquiry(older.clone());
    store.insert_inquiry(newer.clone());
    let server = server(store);

    let res = server.get("/api/bookings").await;
    assert_eq!(res.status_code(), StatusCode::OK);

    let body: Value = res.json();
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["id"], json!(newer.id.to_string()));
    assert_eq!(data[1]["id"], json!(older.id.to_string()));
    // Minimal venue embed only.
    assert_eq!(data[0]["venue"]["name"], json!("Grand Hall"));
    assert_eq!(data[0]["venue"]["city"], json!("Austin"));
    assert!(data[0]["venue"].get("capacity").is_none());
}

#[tokio::test]
async fn health_endpoint_is_alive() {
    let server = server(Arc::new(MemStore::new()));
    let res = server.get("/health").await;
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(res.text(), "ok");
}
