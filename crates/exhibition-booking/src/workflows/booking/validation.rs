use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::domain::{Booking, BookingCandidate, BookingId, BookingStatus, BoothType, Location};

pub const COMPANY_NAME_LENGTH: (usize, usize) = (2, 100);
pub const CONTACT_NAME_LENGTH: (usize, usize) = (2, 50);
pub const PHONE_DIGITS: (usize, usize) = (7, 15);
pub const BOOTHS_PER_BOOKING: (u8, u8) = (1, 10);

/// Form fields a candidate carries, in the order violations are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BookingField {
    CompanyName,
    ContactPersonName,
    Email,
    PhoneNumber,
    BoothType,
    NumberOfBooths,
    PreferredLocation,
}

impl BookingField {
    pub const fn label(self) -> &'static str {
        match self {
            BookingField::CompanyName => "Company name",
            BookingField::ContactPersonName => "Contact person name",
            BookingField::Email => "Email address",
            BookingField::PhoneNumber => "Phone number",
            BookingField::BoothType => "Booth type",
            BookingField::NumberOfBooths => "Number of booths",
            BookingField::PreferredLocation => "Preferred location",
        }
    }

    const fn is_selection(self) -> bool {
        matches!(self, BookingField::BoothType | BookingField::PreferredLocation)
    }
}

/// Why a single field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldViolation {
    Missing,
    Blank,
    TooShort { min: usize },
    TooLong { max: usize },
    InvalidFormat,
    InvalidType,
    BelowMinimum { min: u8 },
    AboveMaximum { max: u8 },
    NotWholeNumber,
    InvalidEnumValue { value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: BookingField,
    pub violation: FieldViolation,
}

impl FieldError {
    fn new(field: BookingField, violation: FieldViolation) -> Self {
        Self { field, violation }
    }

    pub fn message(&self) -> String {
        let label = self.field.label();
        match &self.violation {
            FieldViolation::Missing if self.field.is_selection() => {
                format!("Please select a {}", label.to_lowercase())
            }
            FieldViolation::Missing => format!("{label} is required"),
            FieldViolation::Blank => format!("{label} cannot be empty or contain only spaces"),
            FieldViolation::TooShort { min } => {
                format!("{label} must be at least {min} characters long")
            }
            FieldViolation::TooLong { max } => {
                format!("{label} must be less than {max} characters")
            }
            FieldViolation::InvalidFormat => match self.field {
                BookingField::Email => {
                    "Please enter a valid email address (e.g., user@example.com)".to_string()
                }
                BookingField::PhoneNumber => format!(
                    "Please enter a valid phone number (numbers only, {}-{} digits, no country code)",
                    PHONE_DIGITS.0, PHONE_DIGITS.1
                ),
                _ => format!("{label} is not in a valid format"),
            },
            FieldViolation::InvalidType if self.field == BookingField::NumberOfBooths => {
                format!("{label} must be a number")
            }
            FieldViolation::InvalidType => format!("{label} must be text"),
            FieldViolation::BelowMinimum { min } => format!("{label} must be at least {min}"),
            FieldViolation::AboveMaximum { max } => format!("{label} cannot exceed {max}"),
            FieldViolation::NotWholeNumber => format!("{label} must be a whole number"),
            FieldViolation::InvalidEnumValue { .. } => match self.field {
                BookingField::PreferredLocation => "Please select a valid location".to_string(),
                _ => format!("Please select a valid {}", label.to_lowercase()),
            },
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Every violation found in one candidate. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: BookingField) -> bool {
        self.0.iter().any(|error| error.field == field)
    }

    pub fn violation(&self, field: BookingField) -> Option<&FieldViolation> {
        self.0
            .iter()
            .find(|error| error.field == field)
            .map(|error| &error.violation)
    }

    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(FieldError::message).collect()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Please fix the following errors:\n")?;
        for error in &self.0 {
            write!(f, "\n• {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// A candidate whose fields are present, typed, and normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBooking {
    pub company_name: String,
    pub contact_person_name: String,
    pub email: String,
    pub phone_number: String,
    pub booth_type: BoothType,
    pub number_of_booths: u8,
    pub preferred_location: Location,
}

impl ValidatedBooking {
    pub fn into_booking(self, id: BookingId, created_at: DateTime<Utc>) -> Booking {
        Booking {
            id,
            company_name: self.company_name,
            contact_person_name: self.contact_person_name,
            email: self.email,
            phone_number: self.phone_number,
            booth_type: self.booth_type,
            number_of_booths: self.number_of_booths,
            preferred_location: self.preferred_location,
            created_at,
            status: BookingStatus::Confirmed,
        }
    }
}

/// Check every field and collect all violations rather than stopping at the
/// first one.
pub fn validate(candidate: &BookingCandidate) -> Result<ValidatedBooking, FieldErrors> {
    let mut errors = Vec::new();

    let company_name = collect(
        BookingField::CompanyName,
        text(candidate.company_name.as_ref())
            .and_then(|raw| check_name(raw, COMPANY_NAME_LENGTH)),
        &mut errors,
    );
    let contact_person_name = collect(
        BookingField::ContactPersonName,
        text(candidate.contact_person_name.as_ref())
            .and_then(|raw| check_name(raw, CONTACT_NAME_LENGTH)),
        &mut errors,
    );
    let email = collect(
        BookingField::Email,
        text(candidate.email.as_ref()).and_then(check_email),
        &mut errors,
    );
    let phone_number = collect(
        BookingField::PhoneNumber,
        text(candidate.phone_number.as_ref()).and_then(check_phone),
        &mut errors,
    );
    let booth_type = collect(
        BookingField::BoothType,
        text(candidate.booth_type.as_ref()).and_then(check_code::<BoothType>),
        &mut errors,
    );
    let number_of_booths = collect(
        BookingField::NumberOfBooths,
        check_booth_count(candidate.number_of_booths.as_ref()),
        &mut errors,
    );
    let preferred_location = collect(
        BookingField::PreferredLocation,
        text(candidate.preferred_location.as_ref()).and_then(check_code::<Location>),
        &mut errors,
    );

    match (
        company_name,
        contact_person_name,
        email,
        phone_number,
        booth_type,
        number_of_booths,
        preferred_location,
    ) {
        (
            Some(company_name),
            Some(contact_person_name),
            Some(email),
            Some(phone_number),
            Some(booth_type),
            Some(number_of_booths),
            Some(preferred_location),
        ) if errors.is_empty() => Ok(ValidatedBooking {
            company_name,
            contact_person_name,
            email,
            phone_number,
            booth_type,
            number_of_booths,
            preferred_location,
        }),
        _ => Err(FieldErrors(errors)),
    }
}

/// Strip everything but ASCII digits.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

fn collect<T>(
    field: BookingField,
    outcome: Result<T, FieldViolation>,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(violation) => {
            errors.push(FieldError::new(field, violation));
            None
        }
    }
}

/// Text fields accept only JSON strings; `null` counts as absent.
fn text(raw: Option<&Value>) -> Result<Option<&str>, FieldViolation> {
    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value)),
        Some(_) => Err(FieldViolation::InvalidType),
    }
}

fn required(raw: Option<&str>) -> Result<&str, FieldViolation> {
    match raw {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(FieldViolation::Missing),
    }
}

fn check_name(raw: Option<&str>, (min, max): (usize, usize)) -> Result<String, FieldViolation> {
    let trimmed = required(raw)?.trim();
    let length = trimmed.chars().count();
    if trimmed.is_empty() {
        Err(FieldViolation::Blank)
    } else if length < min {
        Err(FieldViolation::TooShort { min })
    } else if length > max {
        Err(FieldViolation::TooLong { max })
    } else {
        Ok(trimmed.to_string())
    }
}

fn check_email(raw: Option<&str>) -> Result<String, FieldViolation> {
    let value = required(raw)?.trim();
    if value.is_empty() {
        return Err(FieldViolation::Blank);
    }
    if is_valid_email(value) {
        Ok(value.to_string())
    } else {
        Err(FieldViolation::InvalidFormat)
    }
}

/// `local@domain.tld`: one `@`, no whitespace, and a dot strictly inside the
/// domain part.
fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    let clean = |part: &str| {
        !part.is_empty() && !part.contains('@') && !part.contains(char::is_whitespace)
    };
    if !clean(local) || !clean(domain) {
        return false;
    }
    domain
        .char_indices()
        .any(|(index, ch)| ch == '.' && index > 0 && index + 1 < domain.len())
}

fn check_phone(raw: Option<&str>) -> Result<String, FieldViolation> {
    let value = required(raw)?;
    if value.trim().is_empty() {
        return Err(FieldViolation::Blank);
    }
    let digits = normalize_phone(value);
    let (min, max) = PHONE_DIGITS;
    if (min..=max).contains(&digits.len()) {
        Ok(digits)
    } else {
        Err(FieldViolation::InvalidFormat)
    }
}

fn check_code<T>(raw: Option<&str>) -> Result<T, FieldViolation>
where
    T: std::str::FromStr,
{
    let value = required(raw)?.trim();
    if value.is_empty() {
        return Err(FieldViolation::Missing);
    }
    value
        .parse::<T>()
        .map_err(|_| FieldViolation::InvalidEnumValue {
            value: value.to_string(),
        })
}

fn check_booth_count(raw: Option<&Value>) -> Result<u8, FieldViolation> {
    let number = match raw {
        None | Some(Value::Null) => return Err(FieldViolation::Missing),
        Some(Value::Number(number)) => number,
        Some(_) => return Err(FieldViolation::InvalidType),
    };
    let value = number.as_f64().ok_or(FieldViolation::InvalidType)?;
    let (min, max) = BOOTHS_PER_BOOKING;

    if value < f64::from(min) {
        Err(FieldViolation::BelowMinimum { min })
    } else if value > f64::from(max) {
        Err(FieldViolation::AboveMaximum { max })
    } else if value.fract() != 0.0 {
        Err(FieldViolation::NotWholeNumber)
    } else {
        Ok(value as u8)
    }
}
