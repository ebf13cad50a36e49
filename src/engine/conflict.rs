use chrono::NaiveDateTime;

use crate::model::{Booking, BookingId, Span, TIME_FORMAT};

use super::EngineError;

/// Parse a persisted-format timestamp. Any alphabetic character disqualifies
/// the string before the format parse runs.
pub(crate) fn parse_timestamp(
    field: &'static str,
    value: &str,
) -> Result<NaiveDateTime, EngineError> {
    if value.chars().any(|c| c.is_alphabetic()) {
        return Err(EngineError::InvalidFormat {
            field,
            value: value.to_string(),
        });
    }
    NaiveDateTime::parse_from_str(value, TIME_FORMAT).map_err(|_| EngineError::InvalidFormat {
        field,
        value: value.to_string(),
    })
}

/// Entity ids are numeric strings longer than 6 characters.
pub(crate) fn validate_entity_id(field: &'static str, value: &str) -> Result<(), EngineError> {
    if value.len() <= 6 || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(EngineError::InvalidIdentifier {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Half-open overlap scan over one vehicle's bookings.
///
/// `exclude` skips the candidate's own prior record when revalidating an
/// existing booking; at creation time no self-record exists yet.
pub(crate) fn check_no_conflict(
    existing: &[&Booking],
    span: &Span,
    exclude: Option<BookingId>,
) -> Result<(), EngineError> {
    for booking in existing {
        if exclude == Some(booking.id) {
            continue;
        }
        if booking.span.overlaps(span) {
            return Err(EngineError::SchedulingConflict {
                vehicle: booking.vehicle.serial.clone(),
                existing: Some(booking.id),
            });
        }
    }
    Ok(())
}
