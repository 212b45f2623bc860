use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Half-open interval `[start, end)` over calendar instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Span {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        debug_assert!(start < end, "Span start must be before end");
        Self { start, end }
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    #[allow(dead_code)]
    pub fn contains_instant(&self, t: NaiveDateTime) -> bool {
        self.start <= t && t < self.end
    }

    /// Returns true if `self` fully contains `other`.
    #[allow(dead_code)]
    pub fn contains_span(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

// ── Venues ───────────────────────────────────────────────────────

/// A bookable venue. Read-only for this service: venues enter through the
/// catalog file, never through the HTTP surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub id: Ulid,
    pub name: String,
    pub description: String,
    pub city: String,
    pub address: String,
    pub capacity: u32,
    pub price_per_night: f64,
    /// Ordered amenity list. A JSON array at the catalog boundary.
    pub amenities: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// 0.0 to 5.0 when present.
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Minimal venue embed for the administrative inquiry listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueSummary {
    pub id: Ulid,
    pub name: String,
    pub city: String,
}

impl From<&Venue> for VenueSummary {
    fn from(venue: &Venue) -> Self {
        Self {
            id: venue.id,
            name: venue.name.clone(),
            city: venue.city.clone(),
        }
    }
}

// ── Booking inquiries ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl InquiryStatus {
    /// Cancelled inquiries never block availability; pending and confirmed do.
    pub fn blocks_availability(self) -> bool {
        !matches!(self, InquiryStatus::Cancelled)
    }
}

/// A booking inquiry for a venue. Created only by the admission engine;
/// invariant: `end_date > start_date` and, at creation time,
/// `attendee_count <= venue.capacity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingInquiry {
    pub id: Ulid,
    pub venue_id: Ulid,
    pub company_name: String,
    pub email: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub attendee_count: u32,
    pub message: Option<String>,
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingInquiry {
    /// The booked span as a half-open interval.
    pub fn span(&self) -> Span {
        Span::new(self.start_date, self.end_date)
    }
}

/// A created inquiry with its resolved venue, as returned on admission.
#[derive(Debug, Clone, Serialize)]
pub struct InquiryWithVenue {
    #[serde(flatten)]
    pub inquiry: BookingInquiry,
    pub venue: Venue,
}

/// Administrative listing row: inquiry plus minimal venue info.
#[derive(Debug, Clone, Serialize)]
pub struct AdminInquiry {
    #[serde(flatten)]
    pub inquiry: BookingInquiry,
    pub venue: VenueSummary,
}

// ── Listing filters and pagination ───────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VenueFilter {
    /// Case-insensitive substring match on the city name.
    pub city: Option<String>,
    pub min_capacity: Option<u32>,
    pub max_price: Option<f64>,
}

impl VenueFilter {
    pub fn matches(&self, venue: &Venue) -> bool {
        if let Some(ref city) = self.city
            && !venue.city.to_lowercase().contains(&city.to_lowercase())
        {
            return false;
        }
        if let Some(min) = self.min_capacity
            && venue.capacity < min
        {
            return false;
        }
        if let Some(max) = self.max_price
            && venue.price_per_night > max
        {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u64,
    pub has_more: bool,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        Self {
            page,
            limit,
            total,
            total_pages: total.div_ceil(limit as u64),
            has_more: (page as u64) * (limit as u64) < total,
        }
    }
}

/// One page of the venue listing.
#[derive(Debug, Clone, Serialize)]
pub struct VenuePage {
    pub data: Vec<Venue>,
    pub pagination: Pagination,
}
