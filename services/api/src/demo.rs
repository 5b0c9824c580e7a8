use crate::bookings::print_stats;
use chrono::{Duration, Utc};
use clap::Args;
use exhibition_booking::error::AppError;
use exhibition_booking::workflows::booking::{
    demo_bookings, Booking, BookingAdmissionService, BookingCandidate, BookingFilter,
    BookingRepository, BookingServiceError, BookingStatus, CapacityPolicy, Location, MemoryStore,
};
use serde_json::json;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Booth capacity per location (defaults to 50)
    #[arg(long)]
    pub(crate) capacity: Option<u32>,
    /// Start from an empty collection instead of the demo exhibitors
    #[arg(long)]
    pub(crate) empty: bool,
    /// Print the CSV export at the end of the walkthrough
    #[arg(long)]
    pub(crate) show_csv: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let seed = if args.empty {
        Vec::new()
    } else {
        demo_bookings()
    };
    let repository = BookingRepository::open(MemoryStore::with_bookings(seed))?;
    let policy = args.capacity.map(CapacityPolicy::new).unwrap_or_default();
    let service = BookingAdmissionService::new(Arc::new(repository), policy);
    let now = Utc::now();

    println!("Exhibition booking demo");
    println!(
        "Starting with {} booking(s); {} booths per location",
        service.repository().len()?,
        policy.location_capacity()
    );

    println!("\nAdmitting a complete submission");
    let first = demo_candidate("Northwind Traders", "ops@northwind.io", "+1 (555) 201-3344", 2);
    let admitted = report(service.admit_at(&first, now))?;

    println!("\nSame company with different casing");
    let shouted = BookingCandidate {
        preferred_location: Some("outdoor".into()),
        ..demo_candidate("NORTHWIND TRADERS", "sales@northwind.io", "555-201-9999", 1)
    };
    report(service.admit_at(&shouted, now + Duration::seconds(1)))?;

    println!("\nA submission with several problems");
    let sloppy = BookingCandidate {
        company_name: Some(" ".into()),
        email: Some("not-an-email".into()),
        number_of_booths: Some(json!(12)),
        ..demo_candidate("Contoso", "hello@contoso.com", "5551112222", 1)
    };
    report(service.admit_at(&sloppy, now + Duration::seconds(2)))?;

    println!("\nFilling the side hall");
    fill_location(&service, Location::SideHall, now + Duration::seconds(10))?;
    let overflow = BookingCandidate {
        preferred_location: Some(Location::SideHall.code().into()),
        ..demo_candidate("Late Arrival Ltd", "late@arrival.example", "5554445555", 1)
    };
    report(service.admit_at(&overflow, now + Duration::seconds(100)))?;

    if let Some(admitted) = admitted {
        println!("\nCancelling frees the company name again");
        service.update_status(&admitted.id, BookingStatus::Cancelled)?;
        println!("  Booking {} cancelled", admitted.id);
        report(service.admit_at(&shouted, now + Duration::seconds(200)))?;
    }

    println!("\nSummary");
    print_stats(&service.stats()?);

    if args.show_csv {
        println!("\nCSV export");
        print!("{}", service.export_csv(&BookingFilter::default())?);
    }

    Ok(())
}

/// Admit standard-booth exhibitors into `location` until no booth is left.
fn fill_location(
    service: &BookingAdmissionService<MemoryStore>,
    location: Location,
    start: chrono::DateTime<Utc>,
) -> Result<(), AppError> {
    let policy = *service.policy();
    let mut exhibitor = 0u32;
    loop {
        let remaining = policy.remaining_in(location, &service.repository().snapshot()?);
        if remaining == 0 {
            break;
        }
        exhibitor += 1;
        let booths = u8::try_from(remaining.min(10)).unwrap_or(10);
        let candidate = BookingCandidate {
            preferred_location: Some(location.code().into()),
            ..demo_candidate(
                &format!("{} Exhibitor {exhibitor}", location.label()),
                &format!("booth{exhibitor}@{}.example", location.code()),
                &format!("555-300-{exhibitor:04}"),
                booths,
            )
        };
        service.admit_at(&candidate, start + Duration::seconds(i64::from(exhibitor)))?;
    }

    println!(
        "  {} now holds {} of {} booths across {exhibitor} new booking(s)",
        location.label(),
        policy.booked_in(location, &service.repository().snapshot()?),
        policy.location_capacity()
    );
    Ok(())
}

fn demo_candidate(company: &str, email: &str, phone: &str, booths: u8) -> BookingCandidate {
    BookingCandidate {
        company_name: Some(company.into()),
        contact_person_name: Some("Demo Contact".into()),
        email: Some(email.into()),
        phone_number: Some(phone.into()),
        booth_type: Some("standard".into()),
        number_of_booths: Some(json!(booths)),
        preferred_location: Some(Location::MainHallSouth.code().into()),
    }
}

/// Print the outcome of an admission. Rejections are part of the walkthrough;
/// only storage failures abort it.
fn report(outcome: Result<Booking, BookingServiceError>) -> Result<Option<Booking>, AppError> {
    match outcome {
        Ok(booking) => {
            println!(
                "  Admitted {} as booking {} ({} x {} in {}, {})",
                booking.company_name,
                booking.id,
                booking.number_of_booths,
                booking.booth_type.label(),
                booking.preferred_location.label(),
                booking.cost_label()
            );
            Ok(Some(booking))
        }
        Err(BookingServiceError::Admission(err)) => {
            for line in err.to_string().lines().filter(|line| !line.is_empty()) {
                println!("  Rejected: {line}");
            }
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}
