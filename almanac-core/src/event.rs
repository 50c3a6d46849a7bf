//! Event records as they are stored in the event blob.
//!
//! Field names serialize in camelCase (`isAllDay`, `startTime`, ...) so a blob
//! written by the browser version of the calendar loads unchanged.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AlmanacError, AlmanacResult};

/// Minutes assumed for an event that has a start but no end.
pub const DEFAULT_DURATION_MINUTES: u16 = 30;

/// A calendar event filed under one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Opaque unique identifier (UUID v4), never changes
    pub id: String,
    pub text: String,
    /// ISO key the event is filed under; the anchor for recurrence
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub is_all_day: bool,
    #[serde(default)]
    pub start_time: Option<TimeOfDay>,
    #[serde(default)]
    pub end_time: Option<TimeOfDay>,
    #[serde(default)]
    pub color: EventColor,
    #[serde(default)]
    pub repeat: Repeat,
}

impl Event {
    pub fn new(origin: &str, text: &str, options: EventOptions) -> Self {
        let mut event = Event {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.to_string(),
            origin: origin.to_string(),
            is_all_day: options.is_all_day,
            start_time: options.start_time,
            end_time: options.end_time,
            color: options.color,
            repeat: options.repeat,
        };
        if event.is_all_day {
            event.start_time = None;
            event.end_time = None;
        }
        event
    }

    /// Merge the fields present in `patch` over this record.
    ///
    /// `new_date` is not handled here; moving between dates is the store's job.
    /// Text is trimmed, and an all-day result drops both times.
    pub fn apply(&mut self, patch: &EventPatch) {
        if let Some(text) = &patch.text {
            self.text = text.trim().to_string();
        }
        if let Some(is_all_day) = patch.is_all_day {
            self.is_all_day = is_all_day;
        }
        if let Some(start) = patch.start_time {
            self.start_time = start;
        }
        if let Some(end) = patch.end_time {
            self.end_time = end;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(repeat) = patch.repeat {
            self.repeat = repeat;
        }
        if self.is_all_day {
            self.start_time = None;
            self.end_time = None;
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.repeat != Repeat::None
    }

    pub fn start_minutes(&self) -> Option<u16> {
        self.start_time.map(|t| t.minutes())
    }

    /// End of the event in minutes of the day; a missing end counts as start + 30.
    pub fn end_minutes(&self) -> Option<u16> {
        let start = self.start_minutes()?;
        Some(
            self.end_time
                .map(|t| t.minutes())
                .unwrap_or(start + DEFAULT_DURATION_MINUTES),
        )
    }

    /// Length used when the event is dragged somewhere else.
    pub fn duration_minutes(&self) -> u16 {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => end.minutes().saturating_sub(start.minutes()),
            _ => DEFAULT_DURATION_MINUTES,
        }
    }

    /// "All Day", "09:00 - 10:30", "09:00" or "" when unscheduled.
    pub fn time_label(&self) -> String {
        if self.is_all_day {
            return "All Day".to_string();
        }
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => format!("{} - {}", start, end),
            (Some(start), None) => start.to_string(),
            _ => String::new(),
        }
    }
}

/// Options accepted when creating an event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventOptions {
    pub is_all_day: bool,
    pub start_time: Option<TimeOfDay>,
    pub end_time: Option<TimeOfDay>,
    pub color: EventColor,
    pub repeat: Repeat,
}

/// Partial update of an event.
///
/// `None` leaves a field untouched. For the time fields `Some(None)` clears
/// the value. A `new_date` different from the current key moves the event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub text: Option<String>,
    pub is_all_day: Option<bool>,
    pub start_time: Option<Option<TimeOfDay>>,
    pub end_time: Option<Option<TimeOfDay>>,
    pub color: Option<EventColor>,
    pub repeat: Option<Repeat>,
    pub new_date: Option<NaiveDate>,
}

/// An event as shown on a given day, tagged with the key it is stored under.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayEvent {
    #[serde(flatten)]
    pub event: Event,
    pub origin_iso: String,
}

impl DisplayEvent {
    /// True when the event is a recurrence projection from another date.
    pub fn is_projection(&self, shown_on: &str) -> bool {
        self.origin_iso != shown_on
    }
}

// =============================================================================
// Time of day
// =============================================================================

/// Wall-clock time with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "RawTime")]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

/// Stored times may be out of range (older versions let a drag push the end
/// past midnight); they are clamped on load.
#[derive(Deserialize)]
struct RawTime {
    hour: i64,
    #[serde(default)]
    minute: i64,
}

impl From<RawTime> for TimeOfDay {
    fn from(raw: RawTime) -> Self {
        TimeOfDay {
            hour: raw.hour.clamp(0, 23) as u8,
            minute: raw.minute.clamp(0, 59) as u8,
        }
    }
}

impl TimeOfDay {
    pub const LAST_MINUTE: u16 = 23 * 60 + 59;

    pub fn new(hour: u8, minute: u8) -> AlmanacResult<Self> {
        if hour > 23 || minute > 59 {
            return Err(AlmanacError::InvalidTime(format!("{:02}:{:02}", hour, minute)));
        }
        Ok(TimeOfDay { hour, minute })
    }

    /// Build from minutes since midnight, clamped to 23:59.
    pub fn from_minutes(minutes: u16) -> Self {
        let minutes = minutes.min(Self::LAST_MINUTE);
        TimeOfDay {
            hour: (minutes / 60) as u8,
            minute: (minutes % 60) as u8,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    pub fn minutes(&self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = AlmanacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AlmanacError::InvalidTime(s.to_string());

        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;

        TimeOfDay::new(hour, minute).map_err(|_| invalid())
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

// =============================================================================
// Color and repeat
// =============================================================================

/// Color tag from the fixed palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventColor {
    #[default]
    Default,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Gray,
}

impl EventColor {
    pub const ALL: [EventColor; 8] = [
        EventColor::Default,
        EventColor::Red,
        EventColor::Orange,
        EventColor::Yellow,
        EventColor::Green,
        EventColor::Blue,
        EventColor::Purple,
        EventColor::Gray,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventColor::Default => "default",
            EventColor::Red => "red",
            EventColor::Orange => "orange",
            EventColor::Yellow => "yellow",
            EventColor::Green => "green",
            EventColor::Blue => "blue",
            EventColor::Purple => "purple",
            EventColor::Gray => "gray",
        }
    }
}

impl FromStr for EventColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventColor::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<_> = EventColor::ALL.iter().map(|c| c.as_str()).collect();
                format!("Unknown color '{}'. Available: {}", s, names.join(", "))
            })
    }
}

/// Unknown stored colors fall back to the default tag.
impl From<String> for EventColor {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl From<EventColor> for String {
    fn from(color: EventColor) -> Self {
        color.as_str().to_string()
    }
}

impl fmt::Display for EventColor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How an event recurs from its origin date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Repeat {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Repeat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Repeat::None => "none",
            Repeat::Daily => "daily",
            Repeat::Weekly => "weekly",
            Repeat::Monthly => "monthly",
            Repeat::Yearly => "yearly",
        }
    }
}

impl FromStr for Repeat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(Repeat::None),
            "daily" => Ok(Repeat::Daily),
            "weekly" => Ok(Repeat::Weekly),
            "monthly" => Ok(Repeat::Monthly),
            "yearly" => Ok(Repeat::Yearly),
            _ => Err(format!(
                "Unknown repeat mode '{}'. Expected none, daily, weekly, monthly or yearly",
                s
            )),
        }
    }
}

impl From<String> for Repeat {
    fn from(s: String) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl From<Repeat> for String {
    fn from(repeat: Repeat) -> Self {
        repeat.as_str().to_string()
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
