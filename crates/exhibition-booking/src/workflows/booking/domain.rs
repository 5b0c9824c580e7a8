use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Opaque identifier derived from the admission time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(pub String);

impl BookingId {
    /// Millisecond timestamp of `now`, bumped forward until it does not collide
    /// with any id in `existing`.
    pub fn from_time(now: DateTime<Utc>, existing: &[Booking]) -> Self {
        let mut millis = now.timestamp_millis();
        loop {
            let candidate = millis.to_string();
            if existing.iter().all(|booking| booking.id.0 != candidate) {
                return Self(candidate);
            }
            millis += 1;
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stored booth reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    pub company_name: String,
    pub contact_person_name: String,
    pub email: String,
    pub phone_number: String,
    pub booth_type: BoothType,
    pub number_of_booths: u8,
    pub preferred_location: Location,
    pub created_at: DateTime<Utc>,
    pub status: BookingStatus,
}

impl Booking {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Quoted total in whole dollars, `None` for custom booths.
    pub fn total_cost(&self) -> Option<u32> {
        self.booth_type
            .unit_price()
            .map(|price| price * u32::from(self.number_of_booths))
    }

    pub fn cost_label(&self) -> String {
        match self.total_cost() {
            Some(total) => format_usd(total),
            None => CONTACT_FOR_PRICING.to_string(),
        }
    }
}

/// Raw submission as it arrives from a form or API client. Every field is
/// optional and holds whatever JSON the client sent, so a mistyped field is
/// reported by validation alongside every other problem instead of failing
/// deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingCandidate {
    pub company_name: Option<Value>,
    pub contact_person_name: Option<Value>,
    pub email: Option<Value>,
    pub phone_number: Option<Value>,
    pub booth_type: Option<Value>,
    pub number_of_booths: Option<Value>,
    pub preferred_location: Option<Value>,
}

pub const CONTACT_FOR_PRICING: &str = "Contact for pricing";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoothType {
    Standard,
    Premium,
    Custom,
}

impl BoothType {
    pub const fn ordered() -> [Self; 3] {
        [Self::Standard, Self::Premium, Self::Custom]
    }

    pub const fn code(self) -> &'static str {
        match self {
            BoothType::Standard => "standard",
            BoothType::Premium => "premium",
            BoothType::Custom => "custom",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            BoothType::Standard => "Standard Booth",
            BoothType::Premium => "Premium Booth",
            BoothType::Custom => "Custom Booth",
        }
    }

    /// Per-booth price in dollars; custom booths are quoted individually.
    pub const fn unit_price(self) -> Option<u32> {
        match self {
            BoothType::Standard => Some(2_500),
            BoothType::Premium => Some(4_500),
            BoothType::Custom => None,
        }
    }
}

/// The five hall areas a booth can be placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Location {
    MainHall,
    MainHallNorth,
    MainHallSouth,
    SideHall,
    Outdoor,
}

impl Location {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::MainHall,
            Self::MainHallNorth,
            Self::MainHallSouth,
            Self::SideHall,
            Self::Outdoor,
        ]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Location::MainHall => "main-hall",
            Location::MainHallNorth => "main-hall-north",
            Location::MainHallSouth => "main-hall-south",
            Location::SideHall => "side-hall",
            Location::Outdoor => "outdoor",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Location::MainHall => "Main Hall - Center",
            Location::MainHallNorth => "Main Hall - North",
            Location::MainHallSouth => "Main Hall - South",
            Location::SideHall => "Side Hall",
            Location::Outdoor => "Outdoor Area",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Cancelled,
}

impl BookingStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::Confirmed, Self::Pending, Self::Cancelled]
    }

    pub const fn label(self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Pending => "pending",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Cancelled bookings no longer hold their company, contact, or booths.
    pub const fn is_active(self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }
}

/// Raised when a code does not name a known booth type, location, or status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct UnknownCode {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

fn parse_code<T: Copy>(
    raw: &str,
    kind: &'static str,
    variants: &[T],
    code: fn(T) -> &'static str,
) -> Result<T, UnknownCode> {
    let needle = raw.trim();
    variants
        .iter()
        .copied()
        .find(|variant| code(*variant) == needle)
        .ok_or_else(|| UnknownCode {
            kind,
            value: raw.to_string(),
            expected: variants
                .iter()
                .map(|variant| code(*variant))
                .collect::<Vec<_>>()
                .join(", "),
        })
}

impl FromStr for BoothType {
    type Err = UnknownCode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_code(raw, "booth type", &Self::ordered(), Self::code)
    }
}

impl FromStr for Location {
    type Err = UnknownCode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_code(raw, "location", &Self::ordered(), Self::code)
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownCode;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_code(raw, "status", &Self::ordered(), Self::label)
    }
}

/// `$12,500` style rendering used by exports and confirmations.
pub fn format_usd(amount: u32) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("${grouped}")
}
