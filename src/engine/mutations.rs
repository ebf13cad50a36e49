use tracing::info;

use crate::model::{Booking, BookingId, Client, ClientRow, Span, Vehicle, VehicleRow};

use super::conflict::{check_no_conflict, parse_timestamp, validate_entity_id};
use super::{Engine, EngineError, RefKind};

impl Engine {
    /// Validate and persist a new booking. Fail-fast: the first violated
    /// check aborts the whole construction and nothing is committed.
    ///
    /// Check order matters — reference resolution must succeed before the
    /// interval can be tested against the vehicle's booking history:
    /// timestamps, then vehicle, then client, then range and conflicts,
    /// then the durable id allocation and the row append.
    pub fn create_booking(
        &mut self,
        pickup: &str,
        ret: &str,
        client_id: &str,
        vehicle_id: &str,
    ) -> Result<Booking, EngineError> {
        let pickup_ts = parse_timestamp("pickup time", pickup)?;
        let return_ts = parse_timestamp("return time", ret)?;

        validate_entity_id("vehicle serial", vehicle_id)?;
        let vehicle = self
            .vehicles
            .get(vehicle_id)
            .cloned()
            .ok_or_else(|| EngineError::UnknownReference {
                kind: RefKind::Vehicle,
                id: vehicle_id.to_string(),
            })?;

        validate_entity_id("client id", client_id)?;
        let client = self
            .clients
            .get(client_id)
            .cloned()
            .ok_or_else(|| EngineError::UnknownReference {
                kind: RefKind::Client,
                id: client_id.to_string(),
            })?;

        if return_ts <= pickup_ts {
            return Err(EngineError::SchedulingConflict {
                vehicle: vehicle_id.to_string(),
                existing: None,
            });
        }
        let span = Span::new(pickup_ts, return_ts);

        {
            let peers = self.bookings_by_vehicle(vehicle_id);
            check_no_conflict(&peers, &span, None)?;
        }

        // All checks passed: the id allocation is the first durable effect.
        let id = self.alloc.allocate()?;
        let booking = Booking {
            id,
            span,
            client,
            vehicle,
        };
        self.bookings_table.append(&booking.to_row())?;

        self.by_vehicle
            .entry(vehicle_id.to_string())
            .or_default()
            .push(id);
        self.bookings.push(booking.clone());
        info!(id, vehicle = vehicle_id, client = client_id, "booking created");
        Ok(booking)
    }

    pub fn delete_booking(&mut self, id: BookingId) -> Result<(), EngineError> {
        let pos = self
            .bookings
            .iter()
            .position(|b| b.id == id)
            .ok_or(EngineError::NotFound(id))?;

        let rows: Vec<_> = self
            .bookings
            .iter()
            .filter(|b| b.id != id)
            .map(Booking::to_row)
            .collect();
        self.bookings_table.rewrite(&rows)?;

        let booking = self.bookings.remove(pos);
        if let Some(ids) = self.by_vehicle.get_mut(&booking.vehicle.serial) {
            ids.retain(|b| *b != id);
        }
        info!(id, "booking deleted");
        Ok(())
    }

    pub fn register_vehicle(&mut self, vehicle: Vehicle) -> Result<(), EngineError> {
        validate_entity_id("vehicle serial", &vehicle.serial)?;
        if self.vehicles.contains_key(&vehicle.serial) {
            return Err(EngineError::AlreadyExists {
                kind: RefKind::Vehicle,
                id: vehicle.serial.clone(),
            });
        }
        self.vehicles_table.append(&(&vehicle).into())?;
        info!(serial = %vehicle.serial, "vehicle registered");
        self.vehicles.insert(vehicle.serial.clone(), vehicle);
        Ok(())
    }

    pub fn register_client(&mut self, client: Client) -> Result<(), EngineError> {
        validate_entity_id("client id", &client.id)?;
        if self.clients.contains_key(&client.id) {
            return Err(EngineError::AlreadyExists {
                kind: RefKind::Client,
                id: client.id.clone(),
            });
        }
        self.clients_table.append(&(&client).into())?;
        info!(id = %client.id, "client registered");
        self.clients.insert(client.id.clone(), client);
        Ok(())
    }

    /// Edit the live vehicle record. Snapshots embedded in existing
    /// bookings keep the day cost they were created with.
    pub fn update_vehicle_day_cost(
        &mut self,
        serial: &str,
        day_cost: i64,
    ) -> Result<(), EngineError> {
        if !self.vehicles.contains_key(serial) {
            return Err(EngineError::UnknownReference {
                kind: RefKind::Vehicle,
                id: serial.to_string(),
            });
        }
        let rows: Vec<VehicleRow> = self
            .vehicles
            .values()
            .map(|v| {
                let mut row = VehicleRow::from(v);
                if row.serial == serial {
                    row.day_cost = day_cost;
                }
                row
            })
            .collect();
        self.persist_vehicle_rows(rows)?;
        if let Some(vehicle) = self.vehicles.get_mut(serial) {
            vehicle.day_cost = day_cost;
        }
        Ok(())
    }

    /// Referential guard: a vehicle still referenced by any booking cannot
    /// be deleted.
    pub fn delete_vehicle(&mut self, serial: &str) -> Result<(), EngineError> {
        if !self.vehicles.contains_key(serial) {
            return Err(EngineError::UnknownReference {
                kind: RefKind::Vehicle,
                id: serial.to_string(),
            });
        }
        if let Some(booking) = self.bookings_by_vehicle(serial).first() {
            return Err(EngineError::ReferencedByActiveBooking {
                kind: RefKind::Vehicle,
                id: serial.to_string(),
                booking: booking.id,
            });
        }
        let rows: Vec<VehicleRow> = self
            .vehicles
            .values()
            .filter(|v| v.serial != serial)
            .map(VehicleRow::from)
            .collect();
        self.persist_vehicle_rows(rows)?;
        self.vehicles.remove(serial);
        info!(serial, "vehicle deleted");
        Ok(())
    }

    /// Referential guard, client side.
    pub fn delete_client(&mut self, id: &str) -> Result<(), EngineError> {
        if !self.clients.contains_key(id) {
            return Err(EngineError::UnknownReference {
                kind: RefKind::Client,
                id: id.to_string(),
            });
        }
        if let Some(booking) = self.bookings_by_client(id).first() {
            return Err(EngineError::ReferencedByActiveBooking {
                kind: RefKind::Client,
                id: id.to_string(),
                booking: booking.id,
            });
        }
        let rows: Vec<ClientRow> = self
            .clients
            .values()
            .filter(|c| c.id != id)
            .map(ClientRow::from)
            .collect();
        self.persist_client_rows(rows)?;
        self.clients.remove(id);
        info!(id, "client deleted");
        Ok(())
    }
}
