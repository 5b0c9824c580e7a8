use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::booking::router;
use crate::workflows::booking::seed::demo_bookings;
use crate::workflows::booking::store::MemoryStore;

#[tokio::test]
async fn admit_handler_returns_created_booking() {
    let (service, _) = build_service();

    let response =
        router::admit_handler::<MemoryStore>(State(Arc::new(service)), axum::Json(candidate()))
            .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["companyName"], "Acme Corp");
    assert_eq!(body["phoneNumber"], "15550109999");
    assert_eq!(body["status"], "confirmed");
}

#[tokio::test]
async fn admit_handler_lists_every_violation() {
    let (service, _) = build_service();
    let mut invalid = candidate();
    invalid.company_name = Some(" ".into());
    invalid.number_of_booths = Some(json!(0));

    let response =
        router::admit_handler::<MemoryStore>(State(Arc::new(service)), axum::Json(invalid))
            .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    let violations = body["violations"].as_array().expect("violations array");
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0]["field"], "companyName");
    assert_eq!(violations[0]["violation"]["kind"], "blank");
    assert_eq!(violations[1]["field"], "numberOfBooths");
    assert_eq!(
        violations[1]["message"],
        "Number of booths must be at least 1"
    );
    assert!(body["error"]
        .as_str()
        .expect("error text")
        .starts_with("Please fix the following errors:"));
}

#[tokio::test]
async fn admit_handler_returns_conflict_on_double_booking() {
    let (service, _) = service_with(demo_bookings());
    let mut duplicate = candidate();
    duplicate.email = Some("SARAH.JOHNSON@techcorp.com".into());

    let response =
        router::admit_handler::<MemoryStore>(State(Arc::new(service)), axum::Json(duplicate))
            .await;

    assert_conflict_response(&response);
    let body = read_json_body(response).await;
    assert_eq!(body["conflict"]["kind"], "duplicate_email");
    assert_eq!(body["conflict"]["existing_id"], "1703123456789");
    assert_eq!(
        body["error"],
        "Double booking detected: Email \"SARAH.JOHNSON@techcorp.com\" already has a booking (ID: 1703123456789)"
    );
}

#[tokio::test]
async fn admit_handler_returns_internal_error_when_store_fails() {
    let service = failing_service(Vec::new());

    let response =
        router::admit_handler::<FailingStore>(State(Arc::new(service)), axum::Json(candidate()))
            .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn admit_route_accepts_json_payloads() {
    let (service, store) = build_service();
    let router = booking_router_with_service(service);

    let response = router
        .oneshot(
            Request::post("/api/v1/bookings")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::to_vec(&candidate()).expect("serialize candidate"),
                ))
                .expect("request"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(store.snapshot().map(|bookings| bookings.len()), Some(1));
}

#[tokio::test]
async fn admit_route_itemizes_mistyped_fields_with_other_violations() {
    let (service, store) = build_service();
    let router = booking_router_with_service(service);
    let payload = json!({
        "companyName": "Acme Corp",
        "contactPersonName": "Jane Doe",
        "email": "bad",
        "phoneNumber": 5551234567_u64,
        "boothType": "standard",
        "numberOfBooths": 2,
        "preferredLocation": "side-hall",
    });

    let response = router
        .oneshot(
            Request::post("/api/v1/bookings")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .expect("request"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    let violations = body["violations"].as_array().expect("violations array");
    assert_eq!(violations.len(), 2);
    assert_eq!(violations[0]["field"], "email");
    assert_eq!(violations[0]["violation"]["kind"], "invalid_format");
    assert_eq!(violations[1]["field"], "phoneNumber");
    assert_eq!(violations[1]["violation"]["kind"], "invalid_type");
    assert!(body["error"]
        .as_str()
        .expect("error text")
        .starts_with("Please fix the following errors:"));
    assert_eq!(store.snapshot().map(|bookings| bookings.len()), Some(0));
}

#[tokio::test]
async fn list_route_applies_query_filters() {
    let (service, _) = service_with(demo_bookings());
    let router = booking_router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/bookings?booth_type=premium&search=enterprise")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let rows = body.as_array().expect("array body");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], "1703123456793");
}

#[tokio::test]
async fn stats_route_reports_totals() {
    let (service, _) = service_with(demo_bookings());
    let router = booking_router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/bookings/stats")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["total_bookings"], 5);
    assert_eq!(body["pending"], 1);
    assert_eq!(body["total_booths"], 11);
    assert_eq!(body["occupancy"].as_array().map(Vec::len), Some(5));
}

#[tokio::test]
async fn export_route_serves_csv_attachment() {
    let (service, _) = service_with(demo_bookings());
    let router = booking_router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/bookings/export.csv?status=confirmed")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"exhibition-bookings.csv\""
    );
    let body = String::from_utf8(read_body(response).await).expect("utf-8 csv");
    assert_eq!(body.lines().count(), 5);
    assert!(!body.contains("Startup Ventures"));
}

#[tokio::test]
async fn show_route_returns_not_found_for_unknown_id() {
    let (service, _) = service_with(demo_bookings());
    let router = booking_router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/bookings/42")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "booking 42 not found");
}

#[tokio::test]
async fn confirmation_route_serves_text_document() {
    let (service, _) = service_with(demo_bookings());
    let router = booking_router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/bookings/1703123456789/confirmation")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"booking-1703123456789.txt\""
    );
    let body = String::from_utf8(read_body(response).await).expect("utf-8 text");
    assert!(body.contains("  Company: TechCorp Solutions\n"));
}

#[tokio::test]
async fn status_route_updates_and_delete_route_removes() {
    let (service, store) = service_with(demo_bookings());
    let router = booking_router_with_service(service);

    let response = router
        .clone()
        .oneshot(
            Request::patch("/api/v1/bookings/1703123456792/status")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"status":"cancelled"}"#))
                .expect("request"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["status"], "cancelled");

    let response = router
        .oneshot(
            Request::delete("/api/v1/bookings/1703123456792")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(store.snapshot().map(|bookings| bookings.len()), Some(4));
}
