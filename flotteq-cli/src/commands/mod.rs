pub mod book;
pub mod slots;
pub mod vehicles;

pub use book::{handle_book_command, BookArgs};
pub use slots::{handle_slots_command, SlotsArgs};
pub use vehicles::handle_vehicles_command;

use anyhow::Result;
use std::sync::Arc;

use flotteq_core::PortalApiClient;

use crate::config::CliConfig;

/// Build the shared API client from CLI configuration.
pub(crate) fn build_client() -> Result<(CliConfig, Arc<PortalApiClient>)> {
    let config = CliConfig::load()?;

    let mut client = PortalApiClient::with_timeout(
        &config.api_url,
        std::time::Duration::from_secs(config.timeout_secs),
    )?;
    if let Some(token) = &config.api_token {
        client = client.with_token(token);
    }

    Ok((config, Arc::new(client)))
}
