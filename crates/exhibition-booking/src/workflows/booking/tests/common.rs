use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use crate::workflows::booking::domain::{
    Booking, BookingCandidate, BookingId, BookingStatus, BoothType, Location,
};
use crate::workflows::booking::repository::BookingRepository;
use crate::workflows::booking::store::{BookingStore, MemoryStore, StoreError};
use crate::workflows::booking::{booking_router, BookingAdmissionService, CapacityPolicy};

pub(super) fn admitted_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// A submission that passes every validation rule and collides with none of
/// the demo exhibitors.
pub(super) fn candidate() -> BookingCandidate {
    BookingCandidate {
        company_name: Some("Acme Corp".into()),
        contact_person_name: Some("Jane Doe".into()),
        email: Some("jane@acme.com".into()),
        phone_number: Some("+1 (555) 010-9999".into()),
        booth_type: Some("standard".into()),
        number_of_booths: Some(json!(2)),
        preferred_location: Some("side-hall".into()),
    }
}

/// Valid submission for exhibitor `n`; contact details never repeat across
/// different `n`.
pub(super) fn candidate_for(n: u32, company: &str, location: &str, booths: u8) -> BookingCandidate {
    BookingCandidate {
        company_name: Some(company.into()),
        email: Some(format!("events{n}@exhibitor.com").into()),
        phone_number: Some(format!("555-{n:07}").into()),
        preferred_location: Some(location.into()),
        number_of_booths: Some(json!(booths)),
        ..candidate()
    }
}

/// Stored booking with contact details derived from `id` so rows never
/// collide on email or phone.
pub(super) fn booking(
    id: &str,
    company: &str,
    location: Location,
    booths: u8,
    status: BookingStatus,
) -> Booking {
    Booking {
        id: BookingId(id.to_string()),
        company_name: company.to_string(),
        contact_person_name: "Pat Organizer".to_string(),
        email: format!("contact-{id}@example.com"),
        phone_number: format!("4{id:0>9}"),
        booth_type: BoothType::Standard,
        number_of_booths: booths,
        preferred_location: location,
        created_at: admitted_at(),
        status,
    }
}

/// 48 booths held in the main hall across five active bookings.
pub(super) fn nearly_full_main_hall() -> Vec<Booking> {
    vec![
        booking("1", "Alpha Displays", Location::MainHall, 10, BookingStatus::Confirmed),
        booking("2", "Beta Robotics", Location::MainHall, 10, BookingStatus::Confirmed),
        booking("3", "Gamma Foods", Location::MainHall, 10, BookingStatus::Pending),
        booking("4", "Delta Audio", Location::MainHall, 10, BookingStatus::Confirmed),
        booking("5", "Epsilon Print", Location::MainHall, 8, BookingStatus::Confirmed),
    ]
}

pub(super) fn build_service() -> (BookingAdmissionService<MemoryStore>, MemoryStore) {
    service_with(Vec::new())
}

pub(super) fn service_with(
    bookings: Vec<Booking>,
) -> (BookingAdmissionService<MemoryStore>, MemoryStore) {
    let store = MemoryStore::with_bookings(bookings);
    let repository = BookingRepository::open(store.clone()).expect("memory store opens");
    let service = BookingAdmissionService::new(Arc::new(repository), CapacityPolicy::default());
    (service, store)
}

pub(super) fn failing_service(bookings: Vec<Booking>) -> BookingAdmissionService<FailingStore> {
    let repository =
        BookingRepository::open(FailingStore { initial: bookings }).expect("failing store opens");
    BookingAdmissionService::new(Arc::new(repository), CapacityPolicy::default())
}

/// Loads fine, refuses every write.
pub(super) struct FailingStore {
    initial: Vec<Booking>,
}

impl BookingStore for FailingStore {
    fn load(&self) -> Result<Option<Vec<Booking>>, StoreError> {
        Ok(Some(self.initial.clone()))
    }

    fn save(&self, _bookings: &[Booking]) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }

    fn clear(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }
}

pub(super) fn booking_router_with_service(
    service: BookingAdmissionService<MemoryStore>,
) -> axum::Router {
    booking_router(Arc::new(service))
}

pub(super) fn assert_conflict_response(response: &Response) {
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

pub(super) async fn read_body(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body")
        .to_vec()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = read_body(response).await;
    serde_json::from_slice(&body).expect("json payload")
}
