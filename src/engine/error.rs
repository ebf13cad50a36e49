use crate::model::BookingId;

/// Which entity store a foreign reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Vehicle,
    Client,
}

impl RefKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RefKind::Vehicle => "vehicle",
            RefKind::Client => "client",
        }
    }
}

#[derive(Debug)]
pub enum EngineError {
    /// Alphabetic or otherwise unparseable timestamp string.
    InvalidFormat { field: &'static str, value: String },
    /// Entity id string too short or not all digits.
    InvalidIdentifier { field: &'static str, value: String },
    /// Referenced vehicle/client id absent from its store.
    UnknownReference { kind: RefKind, id: String },
    /// Candidate interval is empty/reversed (`existing: None`) or clashes
    /// with a persisted booking for the same vehicle.
    SchedulingConflict {
        vehicle: String,
        existing: Option<BookingId>,
    },
    /// Deletion refused while a booking still references the entity.
    ReferencedByActiveBooking {
        kind: RefKind,
        id: String,
        booking: BookingId,
    },
    /// Operation on a nonexistent booking id.
    NotFound(BookingId),
    /// Duplicate registration under an id already in the store.
    AlreadyExists { kind: RefKind, id: String },
    /// Underlying flat-file store failure.
    Storage(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidFormat { field, value } => {
                write!(
                    f,
                    "invalid {field}: {value:?} must match YYYY-MM-DD HH:MM:SS and contain no letters"
                )
            }
            EngineError::InvalidIdentifier { field, value } => {
                write!(
                    f,
                    "invalid {field}: {value:?} must be digits only and longer than 6 characters"
                )
            }
            EngineError::UnknownReference { kind, id } => {
                write!(f, "no {} with id {id} in the store", kind.as_str())
            }
            EngineError::SchedulingConflict { vehicle, existing } => match existing {
                Some(booking) => write!(
                    f,
                    "vehicle {vehicle} is already taken within the desired time frame (booking {booking})"
                ),
                None => write!(
                    f,
                    "return time must be strictly after pickup time for vehicle {vehicle}"
                ),
            },
            EngineError::ReferencedByActiveBooking { kind, id, booking } => {
                write!(
                    f,
                    "cannot delete {} {id}: referenced by booking {booking}",
                    kind.as_str()
                )
            }
            EngineError::NotFound(id) => write!(f, "booking not found: {id}"),
            EngineError::AlreadyExists { kind, id } => {
                write!(f, "{} {id} already exists", kind.as_str())
            }
            EngineError::Storage(e) => write!(f, "storage error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<std::io::Error> for EngineError {
    fn from(e: std::io::Error) -> Self {
        EngineError::Storage(e.to_string())
    }
}
