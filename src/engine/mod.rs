mod admission;
mod availability;
mod capacity;
mod error;
mod queries;
mod validate;

pub use availability::{check_availability, Availability};
pub use capacity::check_capacity;
pub use error::EngineError;
pub use validate::{
    validate_booking, validate_filters, BookingRequest, FieldErrors, ListingQuery,
};

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use ulid::Ulid;

use crate::store::Store;

/// Booking admission engine. Wraps the injected store with the validation,
/// capacity, and availability checks, and owns the per-venue gates that
/// serialize check-then-insert within this process.
pub struct Engine {
    store: Arc<dyn Store>,
    /// One gate per venue, held across the availability check and the
    /// insert so two concurrent overlapping submissions cannot both pass.
    gates: DashMap<Ulid, Arc<Mutex<()>>>,
}

impl Engine {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            gates: DashMap::new(),
        }
    }

    fn venue_gate(&self, venue_id: Ulid) -> Arc<Mutex<()>> {
        self.gates.entry(venue_id).or_default().clone()
    }
}
