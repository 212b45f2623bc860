use ulid::Ulid;

use crate::store::StoreError;

use super::validate::FieldErrors;

#[derive(Debug)]
pub enum EngineError {
    /// Structural validation failed; every violated field is reported.
    Validation(FieldErrors),
    VenueNotFound,
    /// Requested attendee count is above the venue's capacity.
    CapacityExceeded { requested: u32, capacity: u32 },
    /// Candidate span overlaps the listed non-cancelled inquiries.
    Unavailable { conflicts: Vec<Ulid> },
    /// Storage collaborator failed. Logged server-side, generic to clients.
    Store(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Validation(errors) => {
                write!(f, "validation failed on {} field(s)", errors.len())
            }
            EngineError::VenueNotFound => write!(f, "venue not found"),
            EngineError::CapacityExceeded {
                requested,
                capacity,
            } => write!(
                f,
                "attendee count ({requested}) exceeds venue capacity ({capacity})"
            ),
            EngineError::Unavailable { conflicts } => write!(
                f,
                "venue is not available for the selected dates ({} conflicting inquiries)",
                conflicts.len()
            ),
            EngineError::Store(e) => write!(f, "store error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<StoreError> for EngineError {
    fn from(e: StoreError) -> Self {
        EngineError::Store(e.0)
    }
}
