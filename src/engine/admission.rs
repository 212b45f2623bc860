use chrono::{Local, Utc};
use ulid::Ulid;

use crate::model::{BookingInquiry, InquiryStatus, InquiryWithVenue};

use super::availability::{check_availability, Availability};
use super::capacity::check_capacity;
use super::validate::validate_booking;
use super::{Engine, EngineError};

impl Engine {
    /// Admit a booking inquiry. Terminal on the first failure:
    /// structural validation, venue lookup, capacity, availability, persist.
    /// No step leaves state behind when a later one fails, because the only
    /// write is the final insert.
    pub async fn submit_inquiry(
        &self,
        raw: &serde_json::Value,
    ) -> Result<InquiryWithVenue, EngineError> {
        let request = validate_booking(raw, Local::now().date_naive())
            .map_err(EngineError::Validation)?;

        // An id that cannot be parsed cannot reference any venue.
        let venue_id = Ulid::from_string(&request.venue_id)
            .map_err(|_| EngineError::VenueNotFound)?;

        // Per-venue gate, held from lookup through insert. Serializes
        // concurrent submissions for one venue in this process; a
        // multi-process deployment still needs a storage-level constraint.
        let gate = self.venue_gate(venue_id);
        let _held = gate.lock().await;

        let venue = self
            .store
            .venue_by_id(venue_id)
            .await?
            .ok_or(EngineError::VenueNotFound)?;

        // Cheaper than the availability scan, so it goes first.
        check_capacity(request.attendee_count, venue.capacity)?;

        let existing = self.store.blocking_inquiries(venue_id).await?;
        if let Availability::Conflict(conflicts) =
            check_availability(venue_id, &request.span, &existing)
        {
            return Err(EngineError::Unavailable { conflicts });
        }

        let now = Utc::now();
        let inquiry = BookingInquiry {
            id: Ulid::new(),
            venue_id,
            company_name: request.company_name,
            email: request.email,
            start_date: request.span.start,
            end_date: request.span.end,
            attendee_count: request.attendee_count,
            message: request.message,
            status: InquiryStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.store.create_inquiry(&inquiry).await?;

        Ok(InquiryWithVenue { inquiry, venue })
    }
}
