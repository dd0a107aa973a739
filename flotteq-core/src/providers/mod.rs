mod http;
mod traits;

pub use http::PortalApiClient;
pub use traits::{BookingGateway, SlotProvider, VehicleProvider};
