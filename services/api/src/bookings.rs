use crate::infra::{open_booking_service, parse_code};
use clap::{Args, Subcommand};
use exhibition_booking::config::AppConfig;
use exhibition_booking::error::AppError;
use exhibition_booking::workflows::booking::{
    format_usd, Booking, BookingAdmissionService, BookingCandidate, BookingFilter, BookingId,
    BookingStats, BookingStatus, BookingStore, BoothType, Location,
};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct BookingsArgs {
    /// Override the configured booking store path
    #[arg(long)]
    pub(crate) store_path: Option<PathBuf>,
    #[command(subcommand)]
    pub(crate) command: BookingsCommand,
}

#[derive(Subcommand, Debug)]
pub(crate) enum BookingsCommand {
    /// List bookings, optionally filtered
    List {
        #[command(flatten)]
        filter: FilterArgs,
        /// Print the matching bookings as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one booking
    Show { id: String },
    /// Validate and admit a new booking
    Admit(AdmitArgs),
    /// Overwrite a booking's status
    Status {
        id: String,
        #[arg(value_parser = parse_code::<BookingStatus>)]
        status: BookingStatus,
    },
    /// Remove a booking permanently
    Delete { id: String },
    /// Write bookings as CSV
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        /// Destination file (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Render the confirmation document for a booking
    Confirmation {
        id: String,
        /// Destination file (defaults to stdout)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Summarize bookings, revenue, and location occupancy
    Stats,
    /// Replace every booking with the demo exhibitors
    Reset,
    /// Delete every booking and the stored collection
    Clear,
}

#[derive(Args, Debug, Default)]
pub(crate) struct FilterArgs {
    /// Case-insensitive match on company, contact, email, or id
    #[arg(long)]
    pub(crate) search: Option<String>,
    #[arg(long, value_parser = parse_code::<BookingStatus>)]
    pub(crate) status: Option<BookingStatus>,
    #[arg(long, value_parser = parse_code::<BoothType>)]
    pub(crate) booth_type: Option<BoothType>,
    #[arg(long, value_parser = parse_code::<Location>)]
    pub(crate) location: Option<Location>,
}

impl From<FilterArgs> for BookingFilter {
    fn from(args: FilterArgs) -> Self {
        BookingFilter {
            search: args.search,
            status: args.status,
            booth_type: args.booth_type,
            location: args.location,
        }
    }
}

/// Raw form fields. Nothing is checked here so the service can report every
/// problem at once.
#[derive(Args, Debug, Default)]
pub(crate) struct AdmitArgs {
    #[arg(long)]
    pub(crate) company: Option<String>,
    #[arg(long)]
    pub(crate) contact: Option<String>,
    #[arg(long)]
    pub(crate) email: Option<String>,
    #[arg(long)]
    pub(crate) phone: Option<String>,
    /// standard, premium, or custom
    #[arg(long)]
    pub(crate) booth_type: Option<String>,
    /// Number of booths (1-10)
    #[arg(long)]
    pub(crate) booths: Option<String>,
    /// main-hall, main-hall-north, main-hall-south, side-hall, or outdoor
    #[arg(long)]
    pub(crate) location: Option<String>,
}

impl From<AdmitArgs> for BookingCandidate {
    fn from(args: AdmitArgs) -> Self {
        BookingCandidate {
            company_name: args.company.map(Value::from),
            contact_person_name: args.contact.map(Value::from),
            email: args.email.map(Value::from),
            phone_number: args.phone.map(Value::from),
            booth_type: args.booth_type.map(Value::from),
            number_of_booths: args.booths.map(|raw| booth_count_value(&raw)),
            preferred_location: args.location.map(Value::from),
        }
    }
}

/// Numbers pass through as JSON numbers; anything else stays a string and is
/// rejected by validation as the wrong type.
fn booth_count_value(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw.trim()) {
        Ok(value @ Value::Number(_)) => value,
        _ => Value::String(raw.to_string()),
    }
}

pub(crate) fn run_bookings(args: BookingsArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = args.store_path {
        config.bookings.store_path = path;
    }

    let service = open_booking_service(&config.bookings)?;
    execute(&service, args.command)
}

pub(crate) fn execute<S>(
    service: &BookingAdmissionService<S>,
    command: BookingsCommand,
) -> Result<(), AppError>
where
    S: BookingStore + 'static,
{
    match command {
        BookingsCommand::List { filter, json } => {
            let bookings = service.list(&filter.into())?;
            if json {
                match serde_json::to_string_pretty(&bookings) {
                    Ok(payload) => println!("{payload}"),
                    Err(err) => println!("JSON output unavailable: {err}"),
                }
            } else if bookings.is_empty() {
                println!("No bookings match.");
            } else {
                for booking in &bookings {
                    print_booking_row(booking);
                }
                println!("{} booking(s)", bookings.len());
            }
        }
        BookingsCommand::Show { id } => {
            let booking = service.get(&BookingId(id))?;
            print_booking_detail(&booking);
        }
        BookingsCommand::Admit(args) => {
            let booking = service.admit(&args.into())?;
            println!(
                "Booking {} confirmed for {}: {} x {} in {} ({})",
                booking.id,
                booking.company_name,
                booking.number_of_booths,
                booking.booth_type.label(),
                booking.preferred_location.label(),
                booking.cost_label()
            );
        }
        BookingsCommand::Status { id, status } => {
            let booking = service.update_status(&BookingId(id), status)?;
            println!("Booking {} is now {}", booking.id, booking.status.label());
        }
        BookingsCommand::Delete { id } => {
            let booking = service.delete(&BookingId(id))?;
            println!("Deleted booking {} ({})", booking.id, booking.company_name);
        }
        BookingsCommand::Export { filter, output } => {
            let filter: BookingFilter = filter.into();
            let csv = service.export_csv(&filter)?;
            match output {
                Some(path) => {
                    fs::write(&path, csv)?;
                    println!("Exported bookings to {}", path.display());
                }
                None => print!("{csv}"),
            }
        }
        BookingsCommand::Confirmation { id, output } => {
            let document = service.confirmation(&BookingId(id))?;
            let text = document.render_text();
            match output {
                Some(path) => {
                    fs::write(&path, text)?;
                    println!("Wrote {} to {}", document.file_name, path.display());
                }
                None => print!("{text}"),
            }
        }
        BookingsCommand::Stats => print_stats(&service.stats()?),
        BookingsCommand::Reset => {
            let bookings = service.reset_to_demo()?;
            println!("Reset to {} demo bookings", bookings.len());
        }
        BookingsCommand::Clear => {
            service.clear_all()?;
            println!("All bookings cleared");
        }
    }

    Ok(())
}

fn print_booking_row(booking: &Booking) {
    println!(
        "{:<14} {:<28} {:<15} x{:<3} {:<19} {:<10} {}",
        booking.id.as_str(),
        booking.company_name,
        booking.booth_type.label(),
        booking.number_of_booths,
        booking.preferred_location.label(),
        booking.status.label(),
        booking.cost_label()
    );
}

fn print_booking_detail(booking: &Booking) {
    println!("Booking {}", booking.id);
    println!("  Company:  {}", booking.company_name);
    println!("  Contact:  {}", booking.contact_person_name);
    println!("  Email:    {}", booking.email);
    println!("  Phone:    {}", booking.phone_number);
    println!(
        "  Booths:   {} x {} in {}",
        booking.number_of_booths,
        booking.booth_type.label(),
        booking.preferred_location.label()
    );
    println!("  Status:   {}", booking.status.label());
    println!("  Created:  {}", booking.created_at.to_rfc3339());
    println!("  Total:    {}", booking.cost_label());
}

pub(crate) fn print_stats(stats: &BookingStats) {
    println!("Total bookings: {}", stats.total_bookings);
    println!(
        "  confirmed {} / pending {} / cancelled {}",
        stats.confirmed, stats.pending, stats.cancelled
    );
    println!("Total booths: {}", stats.total_booths);
    println!("Total revenue: {}", format_usd(stats.total_revenue));
    println!("Occupancy:");
    for entry in &stats.occupancy {
        println!(
            "  {:<19} {:>3}/{} booked, {} remaining",
            entry.location_label, entry.booked, entry.capacity, entry.remaining
        );
    }
}
