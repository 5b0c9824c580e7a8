use chrono::{DateTime, Utc};

use super::conflict::{check_conflict, BookingConflict, CapacityPolicy};
use super::domain::{Booking, BookingCandidate, BookingId};
use super::validation::{validate, FieldErrors};

/// Why a candidate was turned away. Validation reports every bad field;
/// conflicts report only the first one found.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AdmissionError {
    #[error(transparent)]
    Validation(#[from] FieldErrors),
    #[error("Double booking detected: {0}")]
    Conflict(#[from] BookingConflict),
}

/// Validate, conflict-check, and append `candidate` to `bookings`.
///
/// On failure `bookings` is left untouched. On success the new booking is
/// confirmed, stamped with `now`, and given an id derived from `now` that is
/// unique within `bookings`.
pub fn admit(
    candidate: &BookingCandidate,
    bookings: &mut Vec<Booking>,
    policy: &CapacityPolicy,
    now: DateTime<Utc>,
) -> Result<Booking, AdmissionError> {
    let validated = validate(candidate)?;
    check_conflict(&validated, bookings, policy).into_result()?;

    let id = BookingId::from_time(now, bookings);
    let booking = validated.into_booking(id, now);
    bookings.push(booking.clone());
    Ok(booking)
}
