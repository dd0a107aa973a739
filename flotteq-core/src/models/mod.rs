mod booking;
mod slot;
mod vehicle;

pub use booking::{Booking, BookingDraft, BookingRequest, BookingStatus, ServiceContext};
pub use slot::{available_windows, hhmm, Slot, SlotQuery, SlotWindow};
pub use vehicle::Vehicle;
