use crate::model::{Booking, BookingId, Client, Vehicle};

use super::Engine;

impl Engine {
    pub fn booking(&self, id: BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    /// All bookings referencing a vehicle, through the per-vehicle index.
    /// This is the read surface the referential guard consumes.
    pub fn bookings_by_vehicle(&self, serial: &str) -> Vec<&Booking> {
        let Some(ids) = self.by_vehicle.get(serial) else {
            return Vec::new();
        };
        ids.iter().filter_map(|id| self.booking(*id)).collect()
    }

    /// All bookings referencing a client. No index: client deletions are
    /// rare enough that a full scan is fine.
    pub fn bookings_by_client(&self, id: &str) -> Vec<&Booking> {
        self.bookings.iter().filter(|b| b.client.id == id).collect()
    }

    pub fn vehicle(&self, serial: &str) -> Option<&Vehicle> {
        self.vehicles.get(serial)
    }

    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.get(id)
    }

    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }
}
