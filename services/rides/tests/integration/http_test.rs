use std::time::Duration;

use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use aeroride_auth_types::identity::JwtSecret;
use aeroride_rides::infra::directions::GoogleDirections;
use aeroride_rides::router::build_router;
use aeroride_rides::state::AppState;
use aeroride_testing::auth::{MockSession, TEST_JWT_SECRET};

/// Router without a database or maps key: every case here is decided before
/// storage, and quotes use the straight-line distance.
fn server() -> TestServer {
    let directions =
        GoogleDirections::new("http://127.0.0.1:9", None, Duration::from_millis(200)).unwrap();
    let state = AppState {
        db: DatabaseConnection::Disconnected,
        jwt_secret: JwtSecret::new(TEST_JWT_SECRET),
        directions,
        currency: "NGN".into(),
    };
    TestServer::new(build_router(state)).unwrap()
}

fn booking_body() -> Value {
    json!({
        "airport_id": "LOS",
        "pickup_location": "Terminal 1",
        "pickup_latitude": 6.5774,
        "pickup_longitude": 3.3212,
        "destination_location": "Victoria Island",
        "destination_latitude": 6.4281,
        "destination_longitude": 3.4219,
        "vehicle_type": "suv"
    })
}

// ── health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_answer_healthz_with_request_id() {
    let response = server().get("/healthz").await;

    response.assert_status(StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

// ── POST /rides/estimate ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_quote_without_session() {
    let response = server()
        .post("/rides/estimate")
        .json(&json!({
            "pickup_latitude": 6.5774,
            "pickup_longitude": 3.3212,
            "destination_latitude": 6.5774,
            "destination_longitude": 3.3212,
            "vehicle_type": "luxury"
        }))
        .await;

    response.assert_status(StatusCode::OK);
    let json: Value = response.json();
    assert_eq!(json["distance_km"], 0.0);
    assert_eq!(json["fare_amount"], 1500.0);
    assert_eq!(json["currency"], "NGN");
    assert_eq!(json["vehicle_type"], "luxury");
    assert_eq!(json["route_source"], "haversine");
}

#[tokio::test]
async fn should_list_missing_estimate_fields() {
    let response = server()
        .post("/rides/estimate")
        .json(&json!({ "pickup_latitude": 6.5774 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["success"], false);
    assert_eq!(json["kind"], "MISSING_FIELDS");
    assert_eq!(
        json["error"],
        "missing required fields: pickup_longitude, destination_latitude, destination_longitude"
    );
}

#[tokio::test]
async fn should_reject_out_of_range_estimate() {
    let response = server()
        .post("/rides/estimate")
        .json(&json!({
            "pickup_latitude": 95.0,
            "pickup_longitude": 3.3212,
            "destination_latitude": 6.4281,
            "destination_longitude": 3.4219
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["kind"], "INVALID_COORDINATES");
}

// ── /rides ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_session_for_bookings() {
    let server = server();

    let response = server.get("/rides").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let json: Value = response.json();
    assert_eq!(json["kind"], "UNAUTHORIZED");

    server
        .post("/rides")
        .json(&booking_body())
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_refresh_token_as_bearer() {
    let session = MockSession::passenger();
    let bearer = HeaderValue::from_str(&format!("Bearer {}", session.refresh_token())).unwrap();

    server()
        .get("/rides")
        .add_header(header::AUTHORIZATION, bearer)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_list_missing_booking_fields() {
    let session = MockSession::passenger();

    let response = server()
        .post("/rides")
        .add_header(header::AUTHORIZATION, session.bearer())
        .json(&json!({ "airport_id": "LOS", "pickup_location": "" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["kind"], "MISSING_FIELDS");
    assert_eq!(
        json["error"],
        "missing required fields: pickup_location, pickup_latitude, pickup_longitude, \
         destination_location, destination_latitude, destination_longitude, vehicle_type"
    );
}

#[tokio::test]
async fn should_reject_booking_with_invalid_coordinates() {
    let session = MockSession::passenger();
    let mut body = booking_body();
    body["destination_longitude"] = json!(200.0);

    let response = server()
        .post("/rides")
        .add_header(header::COOKIE, session.access_cookie())
        .json(&body)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["kind"], "INVALID_COORDINATES");
}

#[tokio::test]
async fn should_validate_status_update_before_lookup() {
    let server = server();
    let session = MockSession::driver();
    let path = format!("/rides/{}", uuid::Uuid::now_v7());

    let response = server
        .patch(&path)
        .add_header(header::AUTHORIZATION, session.bearer())
        .json(&json!({}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["error"], "missing required fields: status");

    let response = server
        .patch(&path)
        .add_header(header::AUTHORIZATION, session.bearer())
        .json(&json!({ "status": "teleported" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["kind"], "UNKNOWN_STATUS");
}

#[tokio::test]
async fn should_require_session_for_single_ride() {
    let path = format!("/rides/{}", uuid::Uuid::now_v7());
    let server = server();

    server.get(&path).await.assert_status(StatusCode::UNAUTHORIZED);
    server
        .delete(&path)
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

// ── /rides/tickets ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_require_session_for_tickets() {
    let server = server();

    let response = server.get("/rides/tickets/some-ticket").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let json: Value = response.json();
    assert_eq!(json["kind"], "UNAUTHORIZED");

    let response = server
        .post("/rides/tickets/scan")
        .json(&json!({ "qr_code": "some-ticket" }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let json: Value = response.json();
    assert_eq!(json["kind"], "UNAUTHORIZED");
}

#[tokio::test]
async fn should_require_code_to_scan() {
    let session = MockSession::driver();

    let response = server()
        .post("/rides/tickets/scan")
        .add_header(header::AUTHORIZATION, session.bearer())
        .json(&json!({ "qr_code": "  " }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["error"], "missing required fields: qr_code");
}
