use crate::models::BookingDraft;

/// The three ordered steps of the booking flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    VehicleSelection,
    SlotSelection,
    Summary,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::VehicleSelection => 1,
            WizardStep::SlotSelection => 2,
            WizardStep::Summary => 3,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, WizardStep::Summary)
    }

    fn next(&self) -> Option<WizardStep> {
        match self {
            WizardStep::VehicleSelection => Some(WizardStep::SlotSelection),
            WizardStep::SlotSelection => Some(WizardStep::Summary),
            WizardStep::Summary => None,
        }
    }

    fn previous(&self) -> Option<WizardStep> {
        match self {
            WizardStep::VehicleSelection => None,
            WizardStep::SlotSelection => Some(WizardStep::VehicleSelection),
            WizardStep::Summary => Some(WizardStep::SlotSelection),
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WizardStep::VehicleSelection => write!(f, "vehicle selection"),
            WizardStep::SlotSelection => write!(f, "slot selection"),
            WizardStep::Summary => write!(f, "summary"),
        }
    }
}

/// The two events a user can fire from the step controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardEvent {
    Next,
    Back,
}

/// Whether forward progress is allowed out of `step` for the given draft.
///
/// Pure function so transition rules are testable without any I/O or UI.
pub fn guard(step: WizardStep, draft: &BookingDraft) -> bool {
    match step {
        WizardStep::VehicleSelection => draft.vehicle_id.is_some(),
        WizardStep::SlotSelection => draft.date.is_some() && draft.slot.is_some(),
        WizardStep::Summary => true,
    }
}

/// Compute the step that follows `step` after `event`.
///
/// A `Next` whose guard fails, a `Next` from the final step, and a `Back`
/// from the first step are all no-ops: the input step is returned unchanged.
/// `Back` never clears draft data.
pub fn transition(step: WizardStep, event: WizardEvent, draft: &BookingDraft) -> WizardStep {
    match event {
        WizardEvent::Next if guard(step, draft) => step.next().unwrap_or(step),
        WizardEvent::Next => step,
        WizardEvent::Back => step.previous().unwrap_or(step),
    }
}
