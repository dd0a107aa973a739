use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::error::{FlotteqError, FlotteqResult};
use crate::models::{Booking, BookingRequest, Slot, SlotQuery, Vehicle};

use super::traits::{BookingGateway, SlotProvider, VehicleProvider};

/// HTTP client for the FlotteQ customer portal API.
///
/// Implements all three provider traits against the REST backend:
/// vehicles, slot availability, and booking creation.
pub struct PortalApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl PortalApiClient {
    pub fn new(base_url: impl Into<String>) -> FlotteqResult<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> FlotteqResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    pub fn from_config(config: &ApiConfig) -> FlotteqResult<Self> {
        let mut api =
            Self::with_timeout(&config.base_url, Duration::from_secs(config.timeout_secs))?;
        if !config.token.is_empty() {
            api.token = Some(config.token.clone());
        }
        Ok(api)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.get(format!("{}{}", self.base_url, path)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.authorize(self.client.post(format!("{}{}", self.base_url, path)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("Content-Type", "application/json");
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    pub async fn health_check(&self) -> FlotteqResult<bool> {
        let response = self.get("/vehicles").send().await;

        match response {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }
}

/// Error payload the backend attaches to rejected requests.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ApiErrorBody {
    fn into_message(self) -> Option<String> {
        self.message.or(self.error).filter(|m| !m.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct VehiclesResponse {
    vehicles: Vec<Vehicle>,
}

#[derive(Debug, Deserialize)]
struct SlotsResponse {
    slots: Vec<Slot>,
}

/// Map a non-success read response onto the error taxonomy.
fn read_failure(status: StatusCode) -> FlotteqError {
    match status.as_u16() {
        401 | 403 => FlotteqError::ApiAuthenticationFailed(status.to_string()),
        429 => FlotteqError::ApiRateLimitExceeded {
            retry_after_secs: 60,
        },
        500..=599 => FlotteqError::ApiServiceUnavailable(status.to_string()),
        _ => FlotteqError::ApiRequestFailed(format!("unexpected status {}", status)),
    }
}

async fn decode_json<T: serde::de::DeserializeOwned>(response: Response) -> FlotteqResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| FlotteqError::ApiParseError(e.to_string()))
}

#[async_trait]
impl VehicleProvider for PortalApiClient {
    async fn list_vehicles(&self) -> FlotteqResult<Vec<Vehicle>> {
        debug!("Fetching vehicle list");

        let response = self.get("/vehicles").send().await?;
        if !response.status().is_success() {
            warn!("Vehicle list request failed with status {}", response.status());
            return Err(read_failure(response.status()));
        }

        let body: VehiclesResponse = decode_json(response).await?;
        info!("Fetched {} vehicles", body.vehicles.len());
        Ok(body.vehicles)
    }
}

#[async_trait]
impl SlotProvider for PortalApiClient {
    async fn list_slots(&self, query: &SlotQuery) -> FlotteqResult<Vec<Slot>> {
        debug!(
            partner = %query.partner_id,
            service = %query.service_id,
            date = %query.date,
            "Fetching slot availability"
        );

        let path = format!(
            "/partners/{}/services/{}/slots",
            query.partner_id, query.service_id
        );

        let response = self
            .get(&path)
            .query(&[
                ("date", query.date.format("%Y-%m-%d").to_string()),
                ("duration", query.duration_minutes.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("Slot query failed with status {}", response.status());
            return Err(read_failure(response.status()));
        }

        let body: SlotsResponse = decode_json(response).await?;
        info!("Fetched {} slots for {}", body.slots.len(), query.date);
        Ok(body.slots)
    }
}

#[async_trait]
impl BookingGateway for PortalApiClient {
    async fn create_booking(&self, request: &BookingRequest) -> FlotteqResult<Booking> {
        info!(
            partner = %request.partner_id,
            service = %request.service_id,
            date = %request.scheduled_date,
            "Submitting booking"
        );

        let response = self.post("/bookings").json(request).send().await?;
        let status = response.status();

        if status.is_success() {
            return decode_json(response).await;
        }

        // Rejections carry a structured body when the backend has something
        // to say; fall back to a generic message otherwise.
        let message = response
            .json::<ApiErrorBody>()
            .await
            .ok()
            .and_then(ApiErrorBody::into_message)
            .unwrap_or_else(|| format!("Booking could not be created (HTTP {})", status.as_u16()));

        warn!("Booking rejected with status {}: {}", status, message);
        Err(FlotteqError::BookingRejected { message })
    }
}
