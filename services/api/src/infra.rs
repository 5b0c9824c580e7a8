use exhibition_booking::config::BookingConfig;
use exhibition_booking::workflows::booking::{
    demo_bookings, BookingAdmissionService, BookingRepository, CapacityPolicy, JsonFileStore,
    RepositoryError, UnknownCode,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type FileBookingService = BookingAdmissionService<JsonFileStore>;

/// Open the file-backed collection described by `config`, seeding an absent
/// store with the demo exhibitors when configured to.
pub(crate) fn open_booking_service(
    config: &BookingConfig,
) -> Result<Arc<FileBookingService>, RepositoryError> {
    let store = JsonFileStore::new(config.store_path.clone());
    let repository = if config.seed_demo_data {
        BookingRepository::open_with_seed(store, demo_bookings())?
    } else {
        BookingRepository::open(store)?
    };

    let policy = CapacityPolicy::new(config.location_capacity);
    let bookings = repository.len()?;
    info!(
        store = %config.store_path.display(),
        bookings,
        location_capacity = policy.location_capacity(),
        "booking store opened"
    );

    Ok(Arc::new(BookingAdmissionService::new(
        Arc::new(repository),
        policy,
    )))
}

/// clap value parser for booth type, location, and status codes.
pub(crate) fn parse_code<T>(raw: &str) -> Result<T, String>
where
    T: FromStr<Err = UnknownCode>,
{
    raw.parse::<T>().map_err(|err| err.to_string())
}
