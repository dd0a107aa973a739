use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{FlotteqError, FlotteqResult};

use super::slot::{hhmm, SlotWindow};

/// The fixed (partner, service) context a wizard instance is opened for.
/// Names are display-only; ids and duration feed every slot query and the
/// final booking request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceContext {
    pub partner_id: String,
    pub service_id: String,
    pub duration_minutes: u32,
    pub partner_name: String,
    pub service_name: String,
}

impl ServiceContext {
    pub fn new(
        partner_id: impl Into<String>,
        service_id: impl Into<String>,
        duration_minutes: u32,
        partner_name: impl Into<String>,
        service_name: impl Into<String>,
    ) -> Self {
        Self {
            partner_id: partner_id.into(),
            service_id: service_id.into(),
            duration_minutes,
            partner_name: partner_name.into(),
            service_name: service_name.into(),
        }
    }
}

/// The accumulating state of an in-progress booking.
///
/// Invariant: `slot` is only meaningful together with `date`. The two are
/// committed atomically by [`BookingDraft::commit_slot`]; any path that
/// changes the date away from the committed one must call
/// [`BookingDraft::discard_slot`] first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingDraft {
    pub vehicle_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub slot: Option<SlotWindow>,
    pub notes: String,
}

impl BookingDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_vehicle(&mut self, vehicle_id: impl Into<String>) {
        self.vehicle_id = Some(vehicle_id.into());
    }

    /// Commit a `{date, slot}` pair. This is the sole path by which the
    /// draft's date and slot advance; they never change independently.
    pub fn commit_slot(&mut self, date: NaiveDate, window: SlotWindow) {
        self.date = Some(date);
        self.slot = Some(window);
    }

    /// Drop both halves of the coupled pair. The slot windows are
    /// date-scoped, so a slot without its date is meaningless.
    pub fn discard_slot(&mut self) {
        self.date = None;
        self.slot = None;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// The first required field still unset, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.vehicle_id.is_none() {
            Some("vehicle")
        } else if self.date.is_none() {
            Some("date")
        } else if self.slot.is_none() {
            Some("slot")
        } else {
            None
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing_field().is_none()
    }
}

/// The outbound payload for booking creation. Built from a complete draft
/// plus the service context immediately before submission, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub partner_id: String,
    pub service_id: String,
    pub vehicle_id: String,
    pub scheduled_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub scheduled_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_notes: Option<String>,
}

impl BookingRequest {
    /// Project a draft into the server-facing shape.
    ///
    /// Fails with the missing field name when the draft is incomplete; the
    /// wizard's guards make that unreachable in practice but the submission
    /// boundary re-checks anyway. Notes are trimmed and omitted when empty.
    pub fn from_draft(context: &ServiceContext, draft: &BookingDraft) -> FlotteqResult<Self> {
        let vehicle_id = draft
            .vehicle_id
            .clone()
            .ok_or(FlotteqError::IncompleteDraft("vehicle"))?;
        let scheduled_date = draft.date.ok_or(FlotteqError::IncompleteDraft("date"))?;
        let window = draft.slot.ok_or(FlotteqError::IncompleteDraft("slot"))?;

        let trimmed = draft.notes.trim();
        let customer_notes = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };

        Ok(Self {
            partner_id: context.partner_id.clone(),
            service_id: context.service_id.clone(),
            vehicle_id,
            scheduled_date,
            scheduled_time: window.start,
            end_time: window.end,
            customer_notes,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Confirmed => write!(f, "confirmed"),
            BookingStatus::Completed => write!(f, "completed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A booking as returned by the backend after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub status: BookingStatus,
    pub scheduled_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub scheduled_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}
