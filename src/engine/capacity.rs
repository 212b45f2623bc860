use super::EngineError;

/// Capacity guard. Fails closed: any attendee count above the venue's
/// capacity is rejected. Runs before the availability check, which needs a
/// store scan this one does not.
pub fn check_capacity(attendee_count: u32, venue_capacity: u32) -> Result<(), EngineError> {
    if attendee_count > venue_capacity {
        return Err(EngineError::CapacityExceeded {
            requested: attendee_count,
            capacity: venue_capacity,
        });
    }
    Ok(())
}
