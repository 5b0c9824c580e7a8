use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::admission::{admit, AdmissionError};
use super::confirmation::ConfirmationDocument;
use super::conflict::{check_conflict, CapacityPolicy, ConflictResult};
use super::domain::{Booking, BookingCandidate, BookingId, BookingStatus};
use super::export::{render_csv, ExportError};
use super::query::{BookingFilter, BookingStats};
use super::repository::{BookingRepository, RepositoryError};
use super::seed::demo_bookings;
use super::store::BookingStore;
use super::validation::{validate, FieldErrors, ValidatedBooking};

/// Front door for every booking operation: admission, status changes,
/// deletion, and the admin read side.
pub struct BookingAdmissionService<S> {
    repository: Arc<BookingRepository<S>>,
    policy: CapacityPolicy,
}

impl<S> BookingAdmissionService<S>
where
    S: BookingStore + 'static,
{
    pub fn new(repository: Arc<BookingRepository<S>>, policy: CapacityPolicy) -> Self {
        Self { repository, policy }
    }

    pub fn policy(&self) -> &CapacityPolicy {
        &self.policy
    }

    pub fn repository(&self) -> &Arc<BookingRepository<S>> {
        &self.repository
    }

    pub fn validate(&self, candidate: &BookingCandidate) -> Result<ValidatedBooking, FieldErrors> {
        validate(candidate)
    }

    /// Dry-run conflict check against the current collection.
    pub fn check_conflict(
        &self,
        candidate: &ValidatedBooking,
    ) -> Result<ConflictResult, BookingServiceError> {
        let existing = self.repository.snapshot()?;
        Ok(check_conflict(candidate, &existing, &self.policy))
    }

    /// Admit a candidate stamped with the current time.
    pub fn admit(&self, candidate: &BookingCandidate) -> Result<Booking, BookingServiceError> {
        self.admit_at(candidate, Utc::now())
    }

    pub fn admit_at(
        &self,
        candidate: &BookingCandidate,
        now: DateTime<Utc>,
    ) -> Result<Booking, BookingServiceError> {
        let outcome = self.repository.mutate(|bookings| {
            admit(candidate, bookings, &self.policy, now).map_err(BookingServiceError::from)
        });

        match &outcome {
            Ok(booking) => info!(
                booking_id = %booking.id,
                location = booking.preferred_location.code(),
                booths = booking.number_of_booths,
                "booking admitted"
            ),
            Err(BookingServiceError::Admission(AdmissionError::Validation(errors))) => {
                info!(violations = errors.len(), "booking rejected by validation")
            }
            Err(BookingServiceError::Admission(AdmissionError::Conflict(conflict))) => {
                info!(%conflict, "booking rejected as double booking")
            }
            Err(err) => warn!(error = %err, "booking admission failed"),
        }

        outcome
    }

    /// Overwrite a booking's status. Any status may follow any other.
    pub fn update_status(
        &self,
        id: &BookingId,
        status: BookingStatus,
    ) -> Result<Booking, BookingServiceError> {
        let (previous, updated) = self.repository.mutate(|bookings| {
            let booking = bookings
                .iter_mut()
                .find(|booking| &booking.id == id)
                .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
            let previous = booking.status;
            booking.status = status;
            Ok::<_, BookingServiceError>((previous, booking.clone()))
        })?;

        info!(
            booking_id = %id,
            from = previous.label(),
            to = status.label(),
            "booking status updated"
        );
        Ok(updated)
    }

    pub fn delete(&self, id: &BookingId) -> Result<Booking, BookingServiceError> {
        let removed = self.repository.mutate(|bookings| {
            let index = bookings
                .iter()
                .position(|booking| &booking.id == id)
                .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
            Ok::<_, BookingServiceError>(bookings.remove(index))
        })?;

        info!(booking_id = %id, "booking deleted");
        Ok(removed)
    }

    pub fn get(&self, id: &BookingId) -> Result<Booking, BookingServiceError> {
        let booking = self
            .repository
            .fetch(id)?
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        Ok(booking)
    }

    pub fn list(&self, filter: &BookingFilter) -> Result<Vec<Booking>, BookingServiceError> {
        let bookings = self.repository.snapshot()?;
        Ok(bookings
            .into_iter()
            .filter(|booking| filter.matches(booking))
            .collect())
    }

    pub fn stats(&self) -> Result<BookingStats, BookingServiceError> {
        let bookings = self.repository.snapshot()?;
        Ok(BookingStats::collect(&bookings, &self.policy))
    }

    pub fn export_csv(&self, filter: &BookingFilter) -> Result<String, BookingServiceError> {
        let bookings = self.list(filter)?;
        Ok(render_csv(&bookings)?)
    }

    pub fn confirmation(
        &self,
        id: &BookingId,
    ) -> Result<ConfirmationDocument, BookingServiceError> {
        let booking = self.get(id)?;
        Ok(ConfirmationDocument::for_booking(&booking))
    }

    /// Replace everything with the demo exhibitors.
    pub fn reset_to_demo(&self) -> Result<Vec<Booking>, BookingServiceError> {
        let bookings = demo_bookings();
        self.repository.replace_all(bookings.clone())?;
        info!(count = bookings.len(), "bookings reset to demo data");
        Ok(bookings)
    }

    pub fn clear_all(&self) -> Result<(), BookingServiceError> {
        self.repository.clear()?;
        info!("all bookings cleared");
        Ok(())
    }
}

/// Error raised by the booking service.
#[derive(Debug, thiserror::Error)]
pub enum BookingServiceError {
    #[error(transparent)]
    Admission(#[from] AdmissionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("booking worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl BookingServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BookingServiceError::Repository(RepositoryError::NotFound(_))
        )
    }
}
