//! Exhibition booth booking: validation, double-booking detection, atomic
//! admission against a persisted collection, and the admin read side.

pub mod admission;
pub mod confirmation;
pub mod conflict;
pub mod domain;
pub mod export;
pub mod query;
pub mod repository;
pub mod router;
pub mod seed;
pub mod service;
pub mod store;
pub mod validation;

#[cfg(test)]
mod tests;

pub use admission::{admit, AdmissionError};
pub use confirmation::{ConfirmationDocument, ConfirmationSection};
pub use conflict::{
    check_conflict, BookingConflict, CapacityPolicy, ConflictResult, DEFAULT_LOCATION_CAPACITY,
};
pub use domain::{
    format_usd, Booking, BookingCandidate, BookingId, BookingStatus, BoothType, Location,
    UnknownCode, CONTACT_FOR_PRICING,
};
pub use export::{render_csv, write_csv, ExportError, EXPORT_FILE_NAME};
pub use query::{BookingFilter, BookingStats, LocationOccupancy};
pub use repository::{BookingRepository, RepositoryError};
pub use router::booking_router;
pub use seed::demo_bookings;
pub use service::{BookingAdmissionService, BookingServiceError};
pub use store::{BookingStore, JsonFileStore, MemoryStore, StoreError, STORAGE_KEY};
pub use validation::{
    normalize_phone, validate, BookingField, FieldError, FieldErrors, FieldViolation,
    ValidatedBooking,
};
