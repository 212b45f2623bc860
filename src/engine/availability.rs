use ulid::Ulid;

use crate::model::{BookingInquiry, Span};

/// Outcome of the availability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    /// Ids of the overlapping non-cancelled inquiries.
    Conflict(Vec<Ulid>),
}

/// Evaluate a candidate span against a venue's existing inquiries.
///
/// Spans are half-open `[start, end)`: two spans overlap iff
/// `s1 < e2 && s2 < e1`, so a candidate that starts exactly when an existing
/// inquiry ends (or the reverse) does not conflict and back-to-back bookings
/// are allowed. Only inquiries for `venue_id` whose status still blocks
/// availability are considered; cancelled inquiries and other venues'
/// inquiries never block, even if the input set was not pre-filtered.
pub fn check_availability(
    venue_id: Ulid,
    candidate: &Span,
    existing: &[BookingInquiry],
) -> Availability {
    let conflicts: Vec<Ulid> = existing
        .iter()
        .filter(|i| i.venue_id == venue_id)
        .filter(|i| i.status.blocks_availability())
        .filter(|i| i.span().overlaps(candidate))
        .map(|i| i.id)
        .collect();

    if conflicts.is_empty() {
        Availability::Available
    } else {
        Availability::Conflict(conflicts)
    }
}
