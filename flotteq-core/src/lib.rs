#![allow(
    clippy::needless_borrows_for_generic_args,
    clippy::manual_range_contains,
    clippy::assertions_on_constants,
    clippy::derivable_impls,
    clippy::type_complexity,
    clippy::ptr_arg,
    clippy::if_same_then_else,
    clippy::wrong_self_convention,
    clippy::manual_clamp,
    clippy::map_entry,
    clippy::len_zero,
    dead_code,
    unused_imports,
    unused_variables,
    unused_mut
)]

pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod wizard;

pub use config::{
    get_config_dir, get_data_dir, ApiConfig, BookingConfig, ConfigLoadError, DisplayConfig,
    FlotteqConfig, LoggingConfig,
};
pub use error::{CliErrorDisplay, FlotteqError, FlotteqResult};
pub use models::{
    available_windows, Booking, BookingDraft, BookingRequest, BookingStatus, ServiceContext, Slot,
    SlotQuery, SlotWindow, Vehicle,
};
pub use providers::{BookingGateway, PortalApiClient, SlotProvider, VehicleProvider};
pub use wizard::{guard, transition, BookingWizard, SlotRefresh, WizardEvent, WizardStep};
