use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use serde_json::Value;
use validator::ValidateEmail;

use crate::model::{PageRequest, Span, VenueFilter};

pub const MIN_COMPANY_NAME_LEN: usize = 2;
pub const MAX_COMPANY_NAME_LEN: usize = 100;
pub const MAX_MESSAGE_LEN: usize = 1000;
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 50;

/// Field-keyed validation messages. Every violation is accumulated; callers
/// never see only the first failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one violation.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

/// A structurally valid booking-inquiry request. The venue reference is kept
/// as submitted; resolving it is the orchestrator's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub venue_id: String,
    pub company_name: String,
    pub email: String,
    pub span: Span,
    pub attendee_count: u32,
    pub message: Option<String>,
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight).
fn parse_instant(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Validate a raw booking-inquiry body. `today` is passed in rather than read
/// from the clock so the same-day boundary is testable.
///
/// Start dates earlier than `today` at midnight are rejected; a start on
/// `today` itself is allowed. The end must be strictly after the start and
/// that violation is reported against `endDate`.
pub fn validate_booking(raw: &Value, today: NaiveDate) -> Result<BookingRequest, FieldErrors> {
    let mut errors = FieldErrors::default();

    let venue_id = match raw.get("venueId").and_then(Value::as_str) {
        Some(s) if !s.is_empty() => Some(s.to_string()),
        _ => {
            errors.push("venueId", "Venue ID is required");
            None
        }
    };

    let company_name = match raw.get("companyName").and_then(Value::as_str) {
        None => {
            errors.push("companyName", "Company name is required");
            None
        }
        Some(s) if s.chars().count() < MIN_COMPANY_NAME_LEN => {
            errors.push(
                "companyName",
                format!("Company name must be at least {MIN_COMPANY_NAME_LEN} characters"),
            );
            None
        }
        Some(s) if s.chars().count() > MAX_COMPANY_NAME_LEN => {
            errors.push(
                "companyName",
                format!("Company name must be less than {MAX_COMPANY_NAME_LEN} characters"),
            );
            None
        }
        Some(s) => Some(s.to_string()),
    };

    let email = match raw.get("email").and_then(Value::as_str) {
        Some(s) if s.validate_email() => Some(s.to_string()),
        _ => {
            errors.push("email", "Please provide a valid email address");
            None
        }
    };

    let midnight = today.and_time(NaiveTime::MIN);
    let start = match raw.get("startDate").and_then(Value::as_str).and_then(parse_instant) {
        Some(t) if t >= midnight => Some(t),
        _ => {
            errors.push("startDate", "Start date must be a valid date in the future");
            None
        }
    };

    let end = match raw.get("endDate").and_then(Value::as_str).and_then(parse_instant) {
        Some(t) => Some(t),
        None => {
            errors.push("endDate", "End date must be a valid date");
            None
        }
    };

    if let (Some(s), Some(e)) = (start, end)
        && e <= s
    {
        errors.push("endDate", "End date must be after start date");
    }

    let attendee_count = match raw.get("attendeeCount") {
        None => {
            errors.push("attendeeCount", "Attendee count is required");
            None
        }
        Some(v) => match v.as_i64() {
            Some(n) if n >= 1 => match u32::try_from(n) {
                Ok(count) => Some(count),
                Err(_) => {
                    errors.push("attendeeCount", "Attendee count is out of range");
                    None
                }
            },
            Some(_) => {
                errors.push("attendeeCount", "Attendee count must be at least 1");
                None
            }
            None => {
                errors.push("attendeeCount", "Attendee count must be a whole number");
                None
            }
        },
    };

    let message = match raw.get("message") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.chars().count() <= MAX_MESSAGE_LEN => Some(s.clone()),
        Some(Value::String(_)) => {
            errors.push(
                "message",
                format!("Message must be less than {MAX_MESSAGE_LEN} characters"),
            );
            None
        }
        Some(_) => {
            errors.push("message", "Message must be a string");
            None
        }
    };

    match (venue_id, company_name, email, start, end, attendee_count) {
        (Some(venue_id), Some(company_name), Some(email), Some(start), Some(end), Some(count))
            if errors.is_empty() =>
        {
            Ok(BookingRequest {
                venue_id,
                company_name,
                email,
                span: Span::new(start, end),
                attendee_count: count,
                message,
            })
        }
        _ => Err(errors),
    }
}

/// A validated venue-listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub filter: VenueFilter,
    pub page: PageRequest,
}

/// Validate listing query parameters. Defaults are only applied when the
/// whole request validates; a caller never proceeds with a partially
/// defaulted request. Out-of-range numeric limits clamp to [1, 50].
pub fn validate_filters(params: &HashMap<String, String>) -> Result<ListingQuery, FieldErrors> {
    let mut errors = FieldErrors::default();

    let city = params.get("city").filter(|s| !s.is_empty()).cloned();

    let min_capacity = match params.get("minCapacity") {
        None => None,
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) if n > 0 => Some(n),
            _ => {
                errors.push("minCapacity", "minCapacity must be a positive integer");
                None
            }
        },
    };

    let max_price = match params.get("maxPrice") {
        None => None,
        Some(raw) => match raw.parse::<f64>() {
            Ok(n) if n > 0.0 && n.is_finite() => Some(n),
            _ => {
                errors.push("maxPrice", "maxPrice must be a positive number");
                None
            }
        },
    };

    let page = match params.get("page") {
        None => 1,
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) if n >= 1 => n,
            _ => {
                errors.push("page", "page must be a positive integer");
                1
            }
        },
    };

    let limit = match params.get("limit") {
        None => DEFAULT_PAGE_SIZE,
        Some(raw) => match raw.parse::<u32>() {
            Ok(n) => n.clamp(1, MAX_PAGE_SIZE),
            Err(_) => {
                errors.push("limit", "limit must be a positive integer");
                DEFAULT_PAGE_SIZE
            }
        },
    };

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(ListingQuery {
        filter: VenueFilter {
            city,
            min_capacity,
            max_price,
        },
        page: PageRequest { page, limit },
    })
}
