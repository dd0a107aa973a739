use async_trait::async_trait;

use crate::error::FlotteqResult;
use crate::models::{Booking, BookingRequest, Slot, SlotQuery, Vehicle};

/// Read access to the requesting user's vehicles.
#[async_trait]
pub trait VehicleProvider: Send + Sync {
    async fn list_vehicles(&self) -> FlotteqResult<Vec<Vehicle>>;
}

/// Read access to slot availability for one (partner, service, date, duration)
/// key. Returns ALL slots with their availability flag; filtering to bookable
/// windows happens on the caller's side.
#[async_trait]
pub trait SlotProvider: Send + Sync {
    async fn list_slots(&self, query: &SlotQuery) -> FlotteqResult<Vec<Slot>>;
}

/// Booking creation. Not idempotent; callers must ensure at most one call per
/// user confirmation.
#[async_trait]
pub trait BookingGateway: Send + Sync {
    async fn create_booking(&self, request: &BookingRequest) -> FlotteqResult<Booking>;
}
