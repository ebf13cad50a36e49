use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Wire format for every persisted timestamp.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Monotonically allocated booking identifier.
pub type BookingId = u64;

/// Half-open interval `[start, end)` with day-and-time granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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

    /// Whole days covered by the span; fractional days truncate toward zero.
    pub fn whole_days(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_days()
    }
}

/// Vehicle snapshot as embedded in a booking. A value copy taken at
/// resolution time, never a live handle into the vehicle store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vehicle {
    pub serial: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub engine: u32,
    pub day_cost: i64,
    pub km: u64,
    /// Client id of the vehicle's owner.
    pub owner: String,
}

/// Client snapshot, same ownership semantics as [`Vehicle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub email: String,
    pub phone: String,
}

/// A validated rental order: one time range, one vehicle, one client.
///
/// Holds resolved snapshots of both references. Later edits to the live
/// vehicle/client do not retroactively change a booking already made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: BookingId,
    pub span: Span,
    pub client: Client,
    pub vehicle: Vehicle,
}

impl Booking {
    /// Total rental cost: whole days times the vehicle's day cost.
    /// A zero-day span (same-day pickup and return) costs 0.
    pub fn cost(&self) -> i64 {
        self.span.whole_days() * self.vehicle.day_cost
    }

    /// Pure serialization to the persisted row layout; no validation.
    pub fn to_row(&self) -> BookingRow {
        BookingRow {
            id: self.id,
            pickup_time: self.span.start.format(TIME_FORMAT).to_string(),
            return_time: self.span.end.format(TIME_FORMAT).to_string(),
            client: self.client.id.clone(),
            vehicle: self.vehicle.serial.clone(),
        }
    }
}

impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "*** Order Details ***\n\
             Order ID: {}\n\
             Pickup Time: {}\n\
             Return Time: {}\n\
             Client: {}\n\
             Vehicle: {}",
            self.id,
            self.span.start.format(TIME_FORMAT),
            self.span.end.format(TIME_FORMAT),
            self.client.id,
            self.vehicle.serial,
        )
    }
}

// ── Persisted row layouts (field order fixed) ────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRow {
    #[serde(rename = "ID")]
    pub id: BookingId,
    #[serde(rename = "Pickup Time")]
    pub pickup_time: String,
    #[serde(rename = "Return Time")]
    pub return_time: String,
    #[serde(rename = "Client")]
    pub client: String,
    #[serde(rename = "Vehicle")]
    pub vehicle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRow {
    #[serde(rename = "Serial")]
    pub serial: String,
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "Model")]
    pub model: String,
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Engine")]
    pub engine: u32,
    #[serde(rename = "Day Cost")]
    pub day_cost: i64,
    #[serde(rename = "KM")]
    pub km: u64,
    #[serde(rename = "Owner")]
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "First Name")]
    pub first_name: String,
    #[serde(rename = "Last Name")]
    pub last_name: String,
    #[serde(rename = "Age")]
    pub age: u32,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Phone")]
    pub phone: String,
}

impl From<&Vehicle> for VehicleRow {
    fn from(v: &Vehicle) -> Self {
        Self {
            serial: v.serial.clone(),
            brand: v.brand.clone(),
            model: v.model.clone(),
            year: v.year,
            engine: v.engine,
            day_cost: v.day_cost,
            km: v.km,
            owner: v.owner.clone(),
        }
    }
}

impl From<VehicleRow> for Vehicle {
    fn from(row: VehicleRow) -> Self {
        Self {
            serial: row.serial,
            brand: row.brand,
            model: row.model,
            year: row.year,
            engine: row.engine,
            day_cost: row.day_cost,
            km: row.km,
            owner: row.owner,
        }
    }
}

impl From<&Client> for ClientRow {
    fn from(c: &Client) -> Self {
        Self {
            id: c.id.clone(),
            first_name: c.first_name.clone(),
            last_name: c.last_name.clone(),
            age: c.age,
            email: c.email.clone(),
            phone: c.phone.clone(),
        }
    }
}

impl From<ClientRow> for Client {
    fn from(row: ClientRow) -> Self {
        Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            age: row.age,
            email: row.email,
            phone: row.phone,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, TIME_FORMAT).unwrap()
    }

    fn vehicle(day_cost: i64) -> Vehicle {
        Vehicle {
            serial: "123456789".into(),
            brand: "Test".into(),
            model: "Testing".into(),
            year: 2023,
            engine: 1600,
            day_cost,
            km: 2000,
            owner: "987654321".into(),
        }
    }

    fn client() -> Client {
        Client {
            id: "987654321".into(),
            first_name: "Test".into(),
            last_name: "Testing".into(),
            age: 20,
            email: "mashu@mashu.com".into(),
            phone: "0501234567".into(),
        }
    }

    #[test]
    fn span_overlap_half_open() {
        let a = Span::new(ts("2023-12-30 00:00:00"), ts("2023-12-31 00:00:00"));
        let b = Span::new(ts("2023-12-30 12:00:00"), ts("2024-01-01 00:00:00"));
        let c = Span::new(ts("2023-12-31 00:00:00"), ts("2024-01-01 00:00:00"));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c)); // adjacent, not overlapping
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn whole_days_truncates() {
        let full = Span::new(ts("2023-12-30 00:00:00"), ts("2023-12-31 00:00:00"));
        assert_eq!(full.whole_days(), 1);
        let partial = Span::new(ts("2023-12-30 20:00:00"), ts("2023-12-31 08:00:00"));
        assert_eq!(partial.whole_days(), 0);
    }

    #[test]
    fn cost_one_day_at_600() {
        let b = Booking {
            id: 1,
            span: Span::new(ts("2023-12-30 00:00:00"), ts("2023-12-31 00:00:00")),
            client: client(),
            vehicle: vehicle(600),
        };
        assert_eq!(b.cost(), 600);
    }

    #[test]
    fn cost_zero_day_is_zero() {
        let b = Booking {
            id: 1,
            span: Span::new(ts("2023-12-30 08:00:00"), ts("2023-12-30 20:00:00")),
            client: client(),
            vehicle: vehicle(600),
        };
        assert_eq!(b.cost(), 0);
    }

    #[test]
    fn row_serializes_bare_identifiers() {
        let b = Booking {
            id: 7,
            span: Span::new(ts("2023-12-30 00:00:00"), ts("2023-12-31 00:00:00")),
            client: client(),
            vehicle: vehicle(600),
        };
        let row = b.to_row();
        assert_eq!(row.id, 7);
        assert_eq!(row.pickup_time, "2023-12-30 00:00:00");
        assert_eq!(row.return_time, "2023-12-31 00:00:00");
        assert_eq!(row.client, "987654321");
        assert_eq!(row.vehicle, "123456789");
    }

    #[test]
    fn display_shows_order_details() {
        let b = Booking {
            id: 3,
            span: Span::new(ts("2023-12-30 00:00:00"), ts("2023-12-31 00:00:00")),
            client: client(),
            vehicle: vehicle(600),
        };
        let text = b.to_string();
        assert!(text.contains("Order ID: 3"));
        assert!(text.contains("Pickup Time: 2023-12-30 00:00:00"));
        assert!(text.contains("Vehicle: 123456789"));
    }
}
