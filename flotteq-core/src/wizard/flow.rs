use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{FlotteqError, FlotteqResult};
use crate::models::{
    available_windows, Booking, BookingDraft, BookingRequest, ServiceContext, SlotQuery,
    SlotWindow, Vehicle,
};
use crate::providers::{BookingGateway, SlotProvider, VehicleProvider};

use super::step::{guard, transition, WizardEvent, WizardStep};

/// Outcome of a slot-availability refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotRefresh {
    /// The response belongs to the currently displayed date and was applied.
    Loaded(Vec<SlotWindow>),
    /// The displayed date changed (or the wizard closed) while the query was
    /// in flight; the response was dropped without touching any state.
    Discarded,
}

#[derive(Debug)]
struct WizardState {
    step: WizardStep,
    draft: BookingDraft,
    vehicles: Vec<Vehicle>,
    displayed_date: Option<NaiveDate>,
    available: Vec<SlotWindow>,
    slot_generation: u64,
    submitting: bool,
    closed: bool,
    last_error: Option<String>,
}

impl WizardState {
    fn new() -> Self {
        Self {
            step: WizardStep::VehicleSelection,
            draft: BookingDraft::new(),
            vehicles: Vec::new(),
            displayed_date: None,
            available: Vec::new(),
            slot_generation: 0,
            submitting: false,
            closed: false,
            last_error: None,
        }
    }

    fn ensure_open(&self) -> FlotteqResult<()> {
        if self.closed {
            Err(FlotteqError::WizardClosed)
        } else {
            Ok(())
        }
    }
}

/// Drives a user through vehicle selection, slot selection, and summary, and
/// performs the final submission.
///
/// The wizard exclusively owns the draft and the current step; callers read
/// snapshots and mutate only through the methods below. Slot queries follow
/// last-request-wins semantics keyed by the displayed date, and at most one
/// booking submission is in flight per instance.
#[derive(Clone)]
pub struct BookingWizard {
    context: ServiceContext,
    vehicle_provider: Arc<dyn VehicleProvider>,
    slot_provider: Arc<dyn SlotProvider>,
    gateway: Arc<dyn BookingGateway>,
    state: Arc<RwLock<WizardState>>,
}

impl BookingWizard {
    pub fn new(
        context: ServiceContext,
        vehicle_provider: Arc<dyn VehicleProvider>,
        slot_provider: Arc<dyn SlotProvider>,
        gateway: Arc<dyn BookingGateway>,
    ) -> Self {
        Self {
            context,
            vehicle_provider,
            slot_provider,
            gateway,
            state: Arc::new(RwLock::new(WizardState::new())),
        }
    }

    pub fn context(&self) -> &ServiceContext {
        &self.context
    }

    /// Load the caller's vehicles and settle the initial step.
    ///
    /// With exactly one vehicle the single-choice screen is pointless: the
    /// vehicle is selected automatically and the wizard opens on slot
    /// selection instead.
    pub async fn open(&self) -> FlotteqResult<Vec<Vehicle>> {
        let vehicles = self.vehicle_provider.list_vehicles().await?;

        let mut state = self.state.write().await;
        state.ensure_open()?;
        state.vehicles = vehicles.clone();

        if vehicles.len() == 1 {
            state.draft.select_vehicle(&vehicles[0].id);
            state.step = WizardStep::SlotSelection;
            info!(
                vehicle = %vehicles[0].id,
                "Single vehicle auto-selected, opening on slot selection"
            );
        }

        Ok(vehicles)
    }

    pub async fn step(&self) -> WizardStep {
        self.state.read().await.step
    }

    pub async fn draft(&self) -> BookingDraft {
        self.state.read().await.draft.clone()
    }

    pub async fn vehicles(&self) -> Vec<Vehicle> {
        self.state.read().await.vehicles.clone()
    }

    /// The vehicle currently chosen in the draft, resolved against the
    /// loaded list. Used for the summary recap.
    pub async fn selected_vehicle(&self) -> Option<Vehicle> {
        let state = self.state.read().await;
        let id = state.draft.vehicle_id.as_deref()?;
        state.vehicles.iter().find(|v| v.id == id).cloned()
    }

    /// Bookable windows for the currently displayed date, as of the latest
    /// applied refresh.
    pub async fn available(&self) -> Vec<SlotWindow> {
        self.state.read().await.available.clone()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }

    pub async fn is_closed(&self) -> bool {
        self.state.read().await.closed
    }

    pub async fn is_submitting(&self) -> bool {
        self.state.read().await.submitting
    }

    pub async fn select_vehicle(&self, vehicle_id: &str) -> FlotteqResult<()> {
        let mut state = self.state.write().await;
        state.ensure_open()?;

        if state.vehicles.is_empty() {
            return Err(FlotteqError::NoVehiclesRegistered);
        }
        if !state.vehicles.iter().any(|v| v.id == vehicle_id) {
            return Err(FlotteqError::VehicleNotFound(vehicle_id.to_string()));
        }

        state.draft.select_vehicle(vehicle_id);
        Ok(())
    }

    /// Display a date and refresh its availability.
    ///
    /// Changing the displayed date away from the committed draft date
    /// discards the committed slot immediately: slot windows are date-scoped
    /// and a pair from another day must never survive in the draft. The
    /// query itself follows last-request-wins semantics; a response that
    /// resolves after a newer `show_date` call (or after close) returns
    /// [`SlotRefresh::Discarded`] and leaves all state untouched.
    ///
    /// Retroactive bookings are rejected: `date` must be today or later.
    pub async fn show_date(&self, date: NaiveDate) -> FlotteqResult<SlotRefresh> {
        if date < Local::now().date_naive() {
            return Err(FlotteqError::PastDateRejected(date));
        }

        let (generation, query) = {
            let mut state = self.state.write().await;
            state.ensure_open()?;

            state.displayed_date = Some(date);
            // No stale list from a previous date while the query is in flight
            state.available.clear();

            if state.draft.date.is_some() && state.draft.date != Some(date) {
                debug!("Displayed date diverged from draft, discarding committed slot");
                state.draft.discard_slot();
            }

            state.slot_generation += 1;
            (
                state.slot_generation,
                SlotQuery {
                    partner_id: self.context.partner_id.clone(),
                    service_id: self.context.service_id.clone(),
                    date,
                    duration_minutes: self.context.duration_minutes,
                },
            )
        };

        let slots = self.slot_provider.list_slots(&query).await?;

        let mut state = self.state.write().await;
        if state.closed || state.slot_generation != generation {
            debug!(%date, "Discarding stale slot response");
            return Ok(SlotRefresh::Discarded);
        }

        let windows = available_windows(&slots);
        state.available = windows.clone();
        Ok(SlotRefresh::Loaded(windows))
    }

    /// Commit `{displayed date, window}` into the draft, atomically.
    ///
    /// This is the only path by which the draft's date/slot pair advances;
    /// picking a date alone commits nothing. The window must be among the
    /// available ones from the latest applied refresh.
    pub async fn choose_slot(&self, window: SlotWindow) -> FlotteqResult<()> {
        let mut state = self.state.write().await;
        state.ensure_open()?;

        let date = state
            .displayed_date
            .ok_or_else(|| FlotteqError::ValidationError("no date displayed".to_string()))?;

        if !state.available.contains(&window) {
            return Err(FlotteqError::SlotUnavailable {
                date,
                window: window.to_string(),
            });
        }

        state.draft.commit_slot(date, window);
        Ok(())
    }

    pub async fn set_notes(&self, notes: impl Into<String>) -> FlotteqResult<()> {
        let mut state = self.state.write().await;
        state.ensure_open()?;
        state.draft.set_notes(notes);
        Ok(())
    }

    /// Whether `advance` would move forward from the current step.
    pub async fn can_advance(&self) -> bool {
        let state = self.state.read().await;
        guard(state.step, &state.draft)
    }

    /// Fire `Next`. A failing guard is a no-op, not an error; the returned
    /// step tells the caller whether anything moved.
    pub async fn advance(&self) -> FlotteqResult<WizardStep> {
        let mut state = self.state.write().await;
        state.ensure_open()?;

        let next = transition(state.step, WizardEvent::Next, &state.draft);
        if next != state.step {
            debug!(from = %state.step, to = %next, "Wizard advanced");
        }
        state.step = next;
        Ok(state.step)
    }

    /// Fire `Back`. Always allowed above the first step; never clears any
    /// previously entered data.
    pub async fn back(&self) -> FlotteqResult<WizardStep> {
        let mut state = self.state.write().await;
        state.ensure_open()?;

        state.step = transition(state.step, WizardEvent::Back, &state.draft);
        Ok(state.step)
    }

    /// Submit the completed draft.
    ///
    /// Only reachable from the summary step. The draft is re-checked for
    /// completeness at this boundary even though the guards already
    /// guarantee it. While a submission is in flight further `confirm`
    /// calls fail with [`FlotteqError::SubmissionInFlight`], so at most one
    /// booking-creation request exists per wizard instance.
    ///
    /// On success the wizard closes and the draft is cleared. On failure the
    /// draft and step are preserved and the server-derived message is
    /// available from [`BookingWizard::last_error`]; no automatic retry.
    pub async fn confirm(&self) -> FlotteqResult<Booking> {
        let request = {
            let mut state = self.state.write().await;
            state.ensure_open()?;

            if !state.step.is_final() {
                return Err(FlotteqError::ValidationError(format!(
                    "confirm is not available from the {} step",
                    state.step
                )));
            }
            if state.submitting {
                return Err(FlotteqError::SubmissionInFlight);
            }

            let request = BookingRequest::from_draft(&self.context, &state.draft)?;
            state.submitting = true;
            state.last_error = None;
            request
        };

        let result = self.gateway.create_booking(&request).await;

        let mut state = self.state.write().await;
        state.submitting = false;

        match result {
            Ok(booking) => {
                info!(booking = %booking.id, "Booking created, closing wizard");
                state.closed = true;
                state.draft = BookingDraft::new();
                Ok(booking)
            }
            Err(err) => {
                let message = err.submission_message();
                warn!("Booking submission failed: {}", message);
                state.last_error = Some(message);
                Err(err)
            }
        }
    }

    /// Close without booking. Any response still in flight is dropped when
    /// it resolves.
    pub async fn cancel(&self) {
        let mut state = self.state.write().await;
        state.closed = true;
    }
}
