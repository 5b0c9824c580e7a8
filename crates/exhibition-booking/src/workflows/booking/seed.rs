use chrono::{DateTime, TimeZone, Utc};

use super::domain::{Booking, BookingId, BookingStatus, BoothType, Location};

struct DemoRow {
    id: &'static str,
    company: &'static str,
    contact: &'static str,
    email: &'static str,
    phone: &'static str,
    booth_type: BoothType,
    booths: u8,
    location: Location,
    created_at: (u32, u32, u32, u32),
    status: BookingStatus,
}

const DEMO_ROWS: [DemoRow; 5] = [
    DemoRow {
        id: "1703123456789",
        company: "TechCorp Solutions",
        contact: "Sarah Johnson",
        email: "sarah.johnson@techcorp.com",
        phone: "15550123",
        booth_type: BoothType::Premium,
        booths: 2,
        location: Location::MainHall,
        created_at: (15, 10, 30, 0),
        status: BookingStatus::Confirmed,
    },
    DemoRow {
        id: "1703123456790",
        company: "Innovate Labs",
        contact: "Michael Chen",
        email: "michael.chen@innovatelabs.com",
        phone: "15550124",
        booth_type: BoothType::Standard,
        booths: 1,
        location: Location::SideHall,
        created_at: (16, 14, 20, 0),
        status: BookingStatus::Confirmed,
    },
    DemoRow {
        id: "1703123456791",
        company: "Global Exhibitions",
        contact: "Emily Rodriguez",
        email: "emily.rodriguez@globalexhibitions.com",
        phone: "15550125",
        booth_type: BoothType::Custom,
        booths: 3,
        location: Location::MainHallNorth,
        created_at: (17, 9, 15, 0),
        status: BookingStatus::Confirmed,
    },
    DemoRow {
        id: "1703123456792",
        company: "Startup Ventures",
        contact: "David Kim",
        email: "david.kim@startupventures.com",
        phone: "15550126",
        booth_type: BoothType::Standard,
        booths: 1,
        location: Location::Outdoor,
        created_at: (18, 16, 45, 0),
        status: BookingStatus::Pending,
    },
    DemoRow {
        id: "1703123456793",
        company: "Enterprise Solutions",
        contact: "Lisa Thompson",
        email: "lisa.thompson@enterprisesolutions.com",
        phone: "15550127",
        booth_type: BoothType::Premium,
        booths: 4,
        location: Location::MainHallSouth,
        created_at: (19, 11, 30, 0),
        status: BookingStatus::Confirmed,
    },
];

fn january_2024(day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, minute, second)
        .single()
        .unwrap_or_default()
}

/// Sample exhibitors loaded into an empty store so the admin views have
/// something to show.
pub fn demo_bookings() -> Vec<Booking> {
    DEMO_ROWS
        .iter()
        .map(|row| {
            let (day, hour, minute, second) = row.created_at;
            Booking {
                id: BookingId(row.id.to_string()),
                company_name: row.company.to_string(),
                contact_person_name: row.contact.to_string(),
                email: row.email.to_string(),
                phone_number: row.phone.to_string(),
                booth_type: row.booth_type,
                number_of_booths: row.booths,
                preferred_location: row.location,
                created_at: january_2024(day, hour, minute, second),
                status: row.status,
            }
        })
        .collect()
}
