use std::fmt::Write;

use serde::Serialize;

use super::domain::Booking;

const TITLE: &str = "Exhibition Booking Confirmation";
const FOOTER: [&str; 2] = ["Thank you for your booking!", "Exhibition Booking System"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationSection {
    pub heading: &'static str,
    pub lines: Vec<(&'static str, String)>,
}

/// Printable summary handed to an exhibitor after admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationDocument {
    pub file_name: String,
    pub title: &'static str,
    pub booking_id: String,
    pub date: String,
    pub sections: Vec<ConfirmationSection>,
    pub footer: [&'static str; 2],
}

impl ConfirmationDocument {
    pub fn for_booking(booking: &Booking) -> Self {
        let sections = vec![
            ConfirmationSection {
                heading: "Company Information",
                lines: vec![
                    ("Company", booking.company_name.clone()),
                    ("Contact", booking.contact_person_name.clone()),
                    ("Email", booking.email.clone()),
                    ("Phone", booking.phone_number.clone()),
                ],
            },
            ConfirmationSection {
                heading: "Booth Details",
                lines: vec![
                    ("Type", booking.booth_type.label().to_string()),
                    ("Quantity", booking.number_of_booths.to_string()),
                    ("Location", booking.preferred_location.label().to_string()),
                    ("Status", booking.status.label().to_string()),
                ],
            },
            ConfirmationSection {
                heading: "Cost Summary",
                lines: vec![("Total Cost", booking.cost_label())],
            },
        ];

        Self {
            file_name: format!("booking-{}.txt", booking.id),
            title: TITLE,
            booking_id: booking.id.to_string(),
            date: booking.created_at.format("%Y-%m-%d").to_string(),
            sections,
            footer: FOOTER,
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let rule = "=".repeat(self.title.len());
        let _ = writeln!(out, "{}\n{rule}\n", self.title);
        let _ = writeln!(out, "Booking ID: {}", self.booking_id);
        let _ = writeln!(out, "Date:       {}", self.date);

        for section in &self.sections {
            let _ = writeln!(out, "\n{}", section.heading);
            for (label, value) in &section.lines {
                let _ = writeln!(out, "  {label}: {value}");
            }
        }

        out.push('\n');
        for line in self.footer {
            let _ = writeln!(out, "{line}");
        }
        out
    }
}
