mod common;

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use jsonwebtoken::{encode, EncodingKey, Header};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use skybook_api::auth::Claims;
use skybook_api::config::AppConfig;
use skybook_api::entities::flight::FlightStatus;
use skybook_api::entities::seat::SeatClass;
use skybook_api::events::EventSender;
use skybook_api::handlers::AppServices;
use skybook_api::AppState;

use common::*;

const JWT_SECRET: &str = "test_secret_key_for_testing_purposes_only_32chars";

async fn test_app(db: Arc<skybook_api::db::DbPool>) -> axum::Router {
    let cfg = AppConfig::for_database("sqlite::memory:");
    let (event_tx, event_rx) = mpsc::channel(64);
    tokio::spawn(skybook_api::events::process_events(event_rx));
    let event_sender = EventSender::new(event_tx);

    let services = AppServices::new(db.clone(), cfg.booking.clone(), Arc::new(event_sender.clone()));
    let state = AppState {
        db,
        config: cfg,
        event_sender,
        services,
    };
    skybook_api::app_router(state)
}

fn bearer_for(customer_id: Uuid) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: customer_id.to_string(),
        exp: (now + 3600) as usize,
        iat: now as usize,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {}", token)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn booking_endpoint_requires_authentication() {
    let db = setup_db().await;
    let app = test_app(db).await;

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/bookings")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "flight_id": 1, "passengers": [] }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn booking_round_trip_over_http() {
    let db = setup_db().await;
    let airplane_id = seed_airplane(&db).await;
    let flight_id = seed_flight(
        &db,
        airplane_id,
        departure_in_hours(5),
        dec!(1000000),
        FlightStatus::Scheduled,
    )
    .await;
    let seat_id = seed_seat(&db, airplane_id, "21A", SeatClass::Business, true).await;

    let app = test_app(db.clone()).await;
    let customer_id = Uuid::new_v4();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/bookings")
                .header("content-type", "application/json")
                .header("authorization", bearer_for(customer_id))
                .body(Body::from(
                    json!({
                        "flight_id": flight_id,
                        "passengers": [
                            { "name": "Nguyen Van A", "seat_id": seat_id, "date_of_birth": "1990-05-17" }
                        ]
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["booking"]["status"], json!("booked"));

    let total = Decimal::from_str(body["data"]["booking"]["total_price"].as_str().unwrap())
        .unwrap();
    assert_eq!(total, dec!(2500000));

    let booking_id = body["data"]["booking"]["booking_id"].as_str().unwrap().to_string();

    // The booking is readable by its owner
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri(format!("/api/v1/bookings/{}", booking_id))
                .header("authorization", bearer_for(customer_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["tickets"].as_array().unwrap().len(), 1);

    // A second request for the same seat now fails as unavailable
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/bookings")
                .header("content-type", "application/json")
                .header("authorization", bearer_for(Uuid::new_v4()))
                .body(Body::from(
                    json!({
                        "flight_id": flight_id,
                        "passengers": [ { "name": "Tran Thi B", "seat_id": seat_id } ]
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["code"], json!("seats_unavailable"));
    assert_eq!(body["seat_ids"], json!([seat_id]));
}

#[tokio::test]
async fn staged_conflict_maps_to_http_409() {
    let db = setup_db().await;
    let airplane_id = seed_airplane(&db).await;
    let flight_id = seed_flight(
        &db,
        airplane_id,
        departure_in_hours(5),
        dec!(1000000),
        FlightStatus::Scheduled,
    )
    .await;
    let seat_id = seed_seat(&db, airplane_id, "22A", SeatClass::Economy, true).await;
    seed_active_ticket(&db, Uuid::new_v4(), flight_id, seat_id, dec!(1000000)).await;

    let app = test_app(db).await;
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/v1/bookings")
                .header("content-type", "application/json")
                .header("authorization", bearer_for(Uuid::new_v4()))
                .body(Body::from(
                    json!({
                        "flight_id": flight_id,
                        "passengers": [ { "name": "Le Van C", "seat_id": seat_id } ]
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["code"], json!("seat_conflict"));
    assert_eq!(body["seat_ids"], json!([seat_id]));
}

#[tokio::test]
async fn flight_and_seat_lookups_are_public() {
    let db = setup_db().await;
    let airplane_id = seed_airplane(&db).await;
    let flight_id = seed_flight(
        &db,
        airplane_id,
        departure_in_hours(5),
        dec!(750000),
        FlightStatus::Scheduled,
    )
    .await;
    seed_seat(&db, airplane_id, "23A", SeatClass::Economy, true).await;
    seed_seat(&db, airplane_id, "23B", SeatClass::Economy, false).await;

    let app = test_app(db).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/flights/{}", flight_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/flights/{}/seats", flight_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let seats = body["data"].as_array().unwrap();
    assert_eq!(seats.len(), 2);
    assert_eq!(
        seats
            .iter()
            .filter(|s| s["is_available"] == json!(true))
            .count(),
        1
    );
}

#[tokio::test]
async fn health_endpoints_respond() {
    let db = setup_db().await;
    let app = test_app(db).await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health/ready")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
