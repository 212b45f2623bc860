use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::io;
use std::path::Path;

use async_trait::async_trait;
use dashmap::DashMap;
use ulid::Ulid;

use crate::model::*;

/// Failure inside the storage collaborator. Surfaced to callers as an
/// internal error; the message is logged, never sent to clients.
#[derive(Debug)]
pub struct StoreError(pub String);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "store error: {}", self.0)
    }
}

impl std::error::Error for StoreError {}

/// The storage collaborator. Constructed once at process start and passed in
/// explicitly; the engine never reaches for a global handle.
#[async_trait]
pub trait Store: Send + Sync {
    async fn venue_by_id(&self, id: Ulid) -> Result<Option<Venue>, StoreError>;

    /// Venues matching `filter`, ordered rating descending (unrated last)
    /// then name ascending, cut to the requested page.
    async fn list_venues(
        &self,
        filter: &VenueFilter,
        page: PageRequest,
    ) -> Result<Vec<Venue>, StoreError>;

    async fn count_venues(&self, filter: &VenueFilter) -> Result<u64, StoreError>;

    /// Distinct city names, alphabetically sorted.
    async fn cities(&self) -> Result<Vec<String>, StoreError>;

    /// Non-cancelled inquiries for one venue.
    async fn blocking_inquiries(&self, venue_id: Ulid) -> Result<Vec<BookingInquiry>, StoreError>;

    async fn create_inquiry(&self, inquiry: &BookingInquiry) -> Result<(), StoreError>;

    /// Every inquiry, newest first.
    async fn list_inquiries(&self) -> Result<Vec<BookingInquiry>, StoreError>;
}

// ── In-memory implementation ─────────────────────────────────────

#[derive(Default)]
pub struct MemStore {
    venues: DashMap<Ulid, Venue>,
    inquiries: DashMap<Ulid, BookingInquiry>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_venue(&self, venue: Venue) {
        self.venues.insert(venue.id, venue);
    }

    /// Direct insert, bypassing admission. Seeding and tests only; the HTTP
    /// surface always goes through the engine.
    pub fn insert_inquiry(&self, inquiry: BookingInquiry) {
        self.inquiries.insert(inquiry.id, inquiry);
    }

    pub fn venue_count(&self) -> usize {
        self.venues.len()
    }

    pub fn inquiry_count(&self) -> usize {
        self.inquiries.len()
    }

    fn matching_venues(&self, filter: &VenueFilter) -> Vec<Venue> {
        self.venues
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }
}

/// Rating descending with unrated venues last, then name ascending.
fn venue_order(a: &Venue, b: &Venue) -> Ordering {
    let ra = a.rating.unwrap_or(f64::NEG_INFINITY);
    let rb = b.rating.unwrap_or(f64::NEG_INFINITY);
    rb.partial_cmp(&ra)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.name.cmp(&b.name))
}

#[async_trait]
impl Store for MemStore {
    async fn venue_by_id(&self, id: Ulid) -> Result<Option<Venue>, StoreError> {
        Ok(self.venues.get(&id).map(|entry| entry.value().clone()))
    }

    async fn list_venues(
        &self,
        filter: &VenueFilter,
        page: PageRequest,
    ) -> Result<Vec<Venue>, StoreError> {
        let mut hits = self.matching_venues(filter);
        hits.sort_by(venue_order);
        Ok(hits
            .into_iter()
            .skip(page.offset())
            .take(page.limit as usize)
            .collect())
    }

    async fn count_venues(&self, filter: &VenueFilter) -> Result<u64, StoreError> {
        Ok(self
            .venues
            .iter()
            .filter(|entry| filter.matches(entry.value()))
            .count() as u64)
    }

    async fn cities(&self) -> Result<Vec<String>, StoreError> {
        let cities: BTreeSet<String> = self
            .venues
            .iter()
            .map(|entry| entry.value().city.clone())
            .collect();
        Ok(cities.into_iter().collect())
    }

    async fn blocking_inquiries(&self, venue_id: Ulid) -> Result<Vec<BookingInquiry>, StoreError> {
        Ok(self
            .inquiries
            .iter()
            .filter(|entry| {
                let i = entry.value();
                i.venue_id == venue_id && i.status.blocks_availability()
            })
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn create_inquiry(&self, inquiry: &BookingInquiry) -> Result<(), StoreError> {
        self.inquiries.insert(inquiry.id, inquiry.clone());
        Ok(())
    }

    async fn list_inquiries(&self) -> Result<Vec<BookingInquiry>, StoreError> {
        let mut all: Vec<BookingInquiry> = self
            .inquiries
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(all)
    }
}

// ── Catalog loading ──────────────────────────────────────────────

/// Load the venue catalog from a JSON file: an array of venues with
/// amenities as a proper JSON array. The one place amenities are decoded.
pub fn load_catalog(path: &Path) -> io::Result<Vec<Venue>> {
    let bytes = std::fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
