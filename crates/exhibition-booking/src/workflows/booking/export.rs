use std::io::Write;

use super::domain::Booking;

pub const EXPORT_FILE_NAME: &str = "exhibition-bookings.csv";

const HEADER: [&str; 11] = [
    "Booking ID",
    "Company",
    "Contact",
    "Email",
    "Phone",
    "Booth Type",
    "Quantity",
    "Location",
    "Status",
    "Date",
    "Amount",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write booking export: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush booking export: {0}")]
    Io(#[from] std::io::Error),
}

/// Write `bookings` as CSV, one row per booking under a fixed header.
pub fn write_csv<'a, W, I>(writer: W, bookings: I) -> Result<(), ExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a Booking>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADER)?;

    for booking in bookings {
        let quantity = booking.number_of_booths.to_string();
        let date = booking.created_at.format("%Y-%m-%d").to_string();
        let amount = booking.cost_label();
        csv_writer.write_record([
            booking.id.as_str(),
            booking.company_name.as_str(),
            booking.contact_person_name.as_str(),
            booking.email.as_str(),
            booking.phone_number.as_str(),
            booking.booth_type.label(),
            quantity.as_str(),
            booking.preferred_location.label(),
            booking.status.label(),
            date.as_str(),
            amount.as_str(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn render_csv<'a, I>(bookings: I) -> Result<String, ExportError>
where
    I: IntoIterator<Item = &'a Booking>,
{
    let mut buffer = Vec::new();
    write_csv(&mut buffer, bookings)?;
    // Every field written above is valid UTF-8.
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::booking::seed::demo_bookings;

    #[test]
    fn renders_header_and_priced_rows() {
        let bookings = demo_bookings();
        let csv = render_csv(&bookings).expect("renders");
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some("Booking ID,Company,Contact,Email,Phone,Booth Type,Quantity,Location,Status,Date,Amount")
        );
        assert_eq!(
            lines.next(),
            Some("1703123456789,TechCorp Solutions,Sarah Johnson,sarah.johnson@techcorp.com,15550123,Premium Booth,2,Main Hall - Center,confirmed,2024-01-15,\"$9,000\"")
        );
        let custom = csv
            .lines()
            .find(|line| line.contains("Global Exhibitions"))
            .expect("custom row");
        assert!(custom.ends_with(",Contact for pricing"));
    }

    #[test]
    fn quotes_fields_with_commas() {
        let mut bookings = demo_bookings();
        bookings.truncate(1);
        bookings[0].company_name = "Acme, Inc.".to_string();

        let csv = render_csv(&bookings).expect("renders");
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let row = reader
            .records()
            .next()
            .expect("one row")
            .expect("parses");
        assert_eq!(&row[1], "Acme, Inc.");
        assert_eq!(&row[10], "$9,000");
    }
}
