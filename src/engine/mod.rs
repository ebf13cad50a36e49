mod conflict;
mod error;
mod mutations;
mod queries;

pub use error::{EngineError, RefKind};

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::alloc::IdAllocator;
use crate::model::*;
use crate::store::Table;

use conflict::parse_timestamp;

/// The booking integrity engine: owns the three flat-file tables, the
/// booking id allocator, and the in-memory state loaded from them.
///
/// Single-threaded and synchronous: every operation validates, persists,
/// and applies in-memory before returning. Persistence happens only after
/// all validation passes, so a failed operation leaves the stores untouched
/// (the counter advance is the one durable side effect that may precede a
/// failed row append, producing an id gap but never reuse).
pub struct Engine {
    vehicles_table: Table<VehicleRow>,
    clients_table: Table<ClientRow>,
    bookings_table: Table<BookingRow>,
    alloc: IdAllocator,

    vehicles: HashMap<String, Vehicle>,
    clients: HashMap<String, Client>,
    bookings: Vec<Booking>,
    /// Vehicle serial → booking ids. Bounds the conflict scan to the
    /// candidate vehicle's own history.
    by_vehicle: HashMap<String, Vec<BookingId>>,
}

impl Engine {
    /// Open (or initialize) the data directory and load all tables.
    ///
    /// Booking rows are re-materialized by resolving their bare vehicle and
    /// client ids against the live stores; a dangling reference means the
    /// files were edited out-of-band and fails the open.
    pub fn open(data_dir: &Path) -> Result<Self, EngineError> {
        fs::create_dir_all(data_dir)?;

        let vehicles_table: Table<VehicleRow> = Table::new(data_dir.join("vehicles.csv"));
        let clients_table: Table<ClientRow> = Table::new(data_dir.join("clients.csv"));
        let bookings_table: Table<BookingRow> = Table::new(data_dir.join("bookings.csv"));
        let alloc = IdAllocator::open(data_dir.join("bookings.seq"))?;

        let mut vehicles = HashMap::new();
        for row in vehicles_table.load()? {
            let vehicle = Vehicle::from(row);
            vehicles.insert(vehicle.serial.clone(), vehicle);
        }

        let mut clients = HashMap::new();
        for row in clients_table.load()? {
            let client = Client::from(row);
            clients.insert(client.id.clone(), client);
        }

        let mut bookings = Vec::new();
        let mut by_vehicle: HashMap<String, Vec<BookingId>> = HashMap::new();
        for row in bookings_table.load()? {
            let pickup = parse_timestamp("pickup time", &row.pickup_time)?;
            let ret = parse_timestamp("return time", &row.return_time)?;
            if ret <= pickup {
                return Err(EngineError::SchedulingConflict {
                    vehicle: row.vehicle.clone(),
                    existing: None,
                });
            }
            let vehicle = vehicles
                .get(&row.vehicle)
                .cloned()
                .ok_or_else(|| EngineError::UnknownReference {
                    kind: RefKind::Vehicle,
                    id: row.vehicle.clone(),
                })?;
            let client = clients
                .get(&row.client)
                .cloned()
                .ok_or_else(|| EngineError::UnknownReference {
                    kind: RefKind::Client,
                    id: row.client.clone(),
                })?;
            by_vehicle
                .entry(vehicle.serial.clone())
                .or_default()
                .push(row.id);
            bookings.push(Booking {
                id: row.id,
                span: Span::new(pickup, ret),
                client,
                vehicle,
            });
        }

        info!(
            vehicles = vehicles.len(),
            clients = clients.len(),
            bookings = bookings.len(),
            next_booking_id = alloc.peek(),
            "tables loaded"
        );

        Ok(Self {
            vehicles_table,
            clients_table,
            bookings_table,
            alloc,
            vehicles,
            clients,
            bookings,
            by_vehicle,
        })
    }

    /// Rewrite the vehicle table, sorted by serial so the file layout is
    /// deterministic. Callers build the target rows up front and touch the
    /// in-memory map only after this succeeds.
    fn persist_vehicle_rows(&self, mut rows: Vec<VehicleRow>) -> Result<(), EngineError> {
        rows.sort_by(|a, b| a.serial.cmp(&b.serial));
        self.vehicles_table.rewrite(&rows)?;
        Ok(())
    }

    fn persist_client_rows(&self, mut rows: Vec<ClientRow>) -> Result<(), EngineError> {
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        self.clients_table.rewrite(&rows)?;
        Ok(())
    }
}
