use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Serde codec for the backend's "HH:MM" time-of-day strings.
///
/// Accepts "HH:MM:SS" on input for tolerance, always emits "HH:MM".
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&value, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&value, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

/// A time window within a single day. Start and end are date-agnostic;
/// the owning query or draft supplies the date they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotWindow {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl SlotWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Parse "HH:MM" into the window starting at that time with the given
    /// duration. Used by the CLI's `--slot` flag.
    pub fn from_start(start: NaiveTime, duration_minutes: u32) -> Self {
        let end = start + chrono::Duration::minutes(i64::from(duration_minutes));
        Self { start, end }
    }
}

impl std::fmt::Display for SlotWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\u{2013}{}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// A bookable window as reported by the backend for one (partner, service,
/// date) query. Never mutated client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(flatten)]
    pub window: SlotWindow,
    pub available: bool,
}

impl Slot {
    pub fn new(window: SlotWindow, available: bool) -> Self {
        Self { window, available }
    }
}

/// The query key for one slot-availability lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotQuery {
    pub partner_id: String,
    pub service_id: String,
    pub date: NaiveDate,
    pub duration_minutes: u32,
}

/// The subset of windows a user may actually pick. Unavailable slots are
/// never offered as choices; the backend re-checks at creation time anyway.
pub fn available_windows(slots: &[Slot]) -> Vec<SlotWindow> {
    slots
        .iter()
        .filter(|s| s.available)
        .map(|s| s.window)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_window_display() {
        let window = SlotWindow::new(t(9, 0), t(9, 30));
        assert_eq!(window.to_string(), "09:00\u{2013}09:30");
    }

    #[test]
    fn test_window_from_start() {
        let window = SlotWindow::from_start(t(14, 0), 30);
        assert_eq!(window.end, t(14, 30));
    }

    #[test]
    fn test_slot_serde_hhmm() {
        let slot: Slot =
            serde_json::from_str(r#"{"start":"09:00","end":"09:30","available":true}"#).unwrap();
        assert_eq!(slot.window.start, t(9, 0));
        assert_eq!(slot.window.end, t(9, 30));
        assert!(slot.available);

        let json = serde_json::to_string(&slot).unwrap();
        assert!(json.contains(r#""start":"09:00""#));
        assert!(json.contains(r#""end":"09:30""#));
    }

    #[test]
    fn test_slot_serde_accepts_seconds() {
        let slot: Slot =
            serde_json::from_str(r#"{"start":"09:00:00","end":"09:30:00","available":false}"#)
                .unwrap();
        assert_eq!(slot.window.start, t(9, 0));
        assert!(!slot.available);
    }

    #[test]
    fn test_available_windows_filters() {
        let slots = vec![
            Slot::new(SlotWindow::new(t(9, 0), t(9, 30)), true),
            Slot::new(SlotWindow::new(t(9, 30), t(10, 0)), false),
            Slot::new(SlotWindow::new(t(10, 0), t(10, 30)), true),
        ];

        let windows = available_windows(&slots);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0], SlotWindow::new(t(9, 0), t(9, 30)));
        assert_eq!(windows[1], SlotWindow::new(t(10, 0), t(10, 30)));
    }

    #[test]
    fn test_available_windows_empty_input() {
        assert!(available_windows(&[]).is_empty());
    }
}
