use serde::Serialize;

use super::domain::{Booking, BookingId, Location};
use super::validation::{normalize_phone, ValidatedBooking};

pub const DEFAULT_LOCATION_CAPACITY: u32 = 50;

/// Ceiling on the booths active bookings may hold in any one location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityPolicy {
    location_capacity: u32,
}

impl CapacityPolicy {
    pub fn new(location_capacity: u32) -> Self {
        let sanitized = if location_capacity > 0 {
            location_capacity
        } else {
            DEFAULT_LOCATION_CAPACITY
        };

        Self {
            location_capacity: sanitized,
        }
    }

    pub fn location_capacity(&self) -> u32 {
        self.location_capacity
    }

    /// Booths already held by non-cancelled bookings at `location`.
    pub fn booked_in(&self, location: Location, existing: &[Booking]) -> u32 {
        existing
            .iter()
            .filter(|booking| booking.is_active() && booking.preferred_location == location)
            .map(|booking| u32::from(booking.number_of_booths))
            .sum()
    }

    pub fn remaining_in(&self, location: Location, existing: &[Booking]) -> u32 {
        self.location_capacity
            .saturating_sub(self.booked_in(location, existing))
    }
}

impl Default for CapacityPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_LOCATION_CAPACITY)
    }
}

/// The first invariant a candidate would break if admitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BookingConflict {
    #[error("Company \"{company_name}\" already has a booking (ID: {existing_id})")]
    DuplicateCompany {
        company_name: String,
        existing_id: BookingId,
    },
    #[error("Email \"{email}\" already has a booking (ID: {existing_id})")]
    DuplicateEmail { email: String, existing_id: BookingId },
    #[error("Phone number \"{phone_number}\" already has a booking (ID: {existing_id})")]
    DuplicatePhone {
        phone_number: String,
        existing_id: BookingId,
    },
    #[error(
        "Location \"{}\" is at capacity. Only {remaining} booths remaining.",
        .location.code()
    )]
    LocationAtCapacity {
        location: Location,
        requested: u8,
        remaining: u32,
        capacity: u32,
    },
}

impl BookingConflict {
    /// Id of the booking the candidate collides with, if it is a duplicate.
    pub fn existing_id(&self) -> Option<&BookingId> {
        match self {
            BookingConflict::DuplicateCompany { existing_id, .. }
            | BookingConflict::DuplicateEmail { existing_id, .. }
            | BookingConflict::DuplicatePhone { existing_id, .. } => Some(existing_id),
            BookingConflict::LocationAtCapacity { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictResult {
    Clear,
    Conflict(BookingConflict),
}

impl ConflictResult {
    pub fn is_clear(&self) -> bool {
        matches!(self, ConflictResult::Clear)
    }

    pub fn into_result(self) -> Result<(), BookingConflict> {
        match self {
            ConflictResult::Clear => Ok(()),
            ConflictResult::Conflict(conflict) => Err(conflict),
        }
    }
}

/// Compare a candidate against the active bookings. Checks run in a fixed
/// priority (company, email, phone, capacity) and stop at the first hit.
pub fn check_conflict(
    candidate: &ValidatedBooking,
    existing: &[Booking],
    policy: &CapacityPolicy,
) -> ConflictResult {
    let active: Vec<&Booking> = existing.iter().filter(|booking| booking.is_active()).collect();

    let company = candidate.company_name.to_lowercase();
    if let Some(found) = active
        .iter()
        .find(|booking| booking.company_name.to_lowercase() == company)
    {
        return ConflictResult::Conflict(BookingConflict::DuplicateCompany {
            company_name: candidate.company_name.clone(),
            existing_id: found.id.clone(),
        });
    }

    let email = candidate.email.to_lowercase();
    if let Some(found) = active
        .iter()
        .find(|booking| booking.email.to_lowercase() == email)
    {
        return ConflictResult::Conflict(BookingConflict::DuplicateEmail {
            email: candidate.email.clone(),
            existing_id: found.id.clone(),
        });
    }

    // Stored numbers may predate normalization, so compare digits only.
    if let Some(found) = active
        .iter()
        .find(|booking| normalize_phone(&booking.phone_number) == candidate.phone_number)
    {
        return ConflictResult::Conflict(BookingConflict::DuplicatePhone {
            phone_number: candidate.phone_number.clone(),
            existing_id: found.id.clone(),
        });
    }

    let location = candidate.preferred_location;
    let booked = policy.booked_in(location, existing);
    let capacity = policy.location_capacity();
    if booked + u32::from(candidate.number_of_booths) > capacity {
        return ConflictResult::Conflict(BookingConflict::LocationAtCapacity {
            location,
            requested: candidate.number_of_booths,
            remaining: capacity.saturating_sub(booked),
            capacity,
        });
    }

    ConflictResult::Clear
}
