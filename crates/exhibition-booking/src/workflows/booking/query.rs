use serde::{Deserialize, Serialize};

use super::conflict::CapacityPolicy;
use super::domain::{Booking, BookingStatus, BoothType, Location};

/// Admin table filter. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingFilter {
    /// Case-insensitive substring of company, contact, or email; plain
    /// substring of the id.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<BookingStatus>,
    #[serde(default)]
    pub booth_type: Option<BoothType>,
    #[serde(default)]
    pub location: Option<Location>,
}

impl BookingFilter {
    pub fn matches(&self, booking: &Booking) -> bool {
        self.matches_search(booking)
            && self.status.map_or(true, |status| booking.status == status)
            && self
                .booth_type
                .map_or(true, |booth_type| booking.booth_type == booth_type)
            && self
                .location
                .map_or(true, |location| booking.preferred_location == location)
    }

    fn matches_search(&self, booking: &Booking) -> bool {
        let Some(term) = self.search.as_deref().filter(|term| !term.is_empty()) else {
            return true;
        };
        let needle = term.to_lowercase();
        booking.company_name.to_lowercase().contains(&needle)
            || booking.contact_person_name.to_lowercase().contains(&needle)
            || booking.email.to_lowercase().contains(&needle)
            || booking.id.as_str().contains(term)
    }

    pub fn apply<'a>(&self, bookings: &'a [Booking]) -> Vec<&'a Booking> {
        bookings.iter().filter(|booking| self.matches(booking)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationOccupancy {
    pub location: Location,
    pub location_label: &'static str,
    pub booked: u32,
    pub remaining: u32,
    pub capacity: u32,
}

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingStats {
    pub total_bookings: usize,
    pub confirmed: usize,
    pub pending: usize,
    pub cancelled: usize,
    pub total_booths: u32,
    pub total_revenue: u32,
    pub occupancy: Vec<LocationOccupancy>,
}

impl BookingStats {
    /// Totals count every booking regardless of status; occupancy only counts
    /// the bookings that hold capacity.
    pub fn collect(bookings: &[Booking], policy: &CapacityPolicy) -> Self {
        let count = |status: BookingStatus| {
            bookings
                .iter()
                .filter(|booking| booking.status == status)
                .count()
        };

        let occupancy = Location::ordered()
            .into_iter()
            .map(|location| LocationOccupancy {
                location,
                location_label: location.label(),
                booked: policy.booked_in(location, bookings),
                remaining: policy.remaining_in(location, bookings),
                capacity: policy.location_capacity(),
            })
            .collect();

        Self {
            total_bookings: bookings.len(),
            confirmed: count(BookingStatus::Confirmed),
            pending: count(BookingStatus::Pending),
            cancelled: count(BookingStatus::Cancelled),
            total_booths: bookings
                .iter()
                .map(|booking| u32::from(booking.number_of_booths))
                .sum(),
            total_revenue: bookings.iter().filter_map(Booking::total_cost).sum(),
            occupancy,
        }
    }
}
