//! Application state and the single event form.
//!
//! State changes are pure: [`AppState::apply`] takes the current state and an
//! [`Action`] and returns the next state. The event form is one handler,
//! [`submit_form`], that branches on [`FormMode`].

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::date::{iso_key, shift_months, start_of_month};
use crate::error::{AlmanacError, AlmanacResult};
use crate::event::{Event, EventColor, EventOptions, EventPatch, Repeat, TimeOfDay};
use crate::storage::Storage;
use crate::store::{EventStore, UpdateOutcome};

/// Storage key of the persisted view state.
pub const STATE_KEY: &str = "almanac_view_state";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Month,
    Week,
    Day,
    Year,
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(View::Month),
            "week" => Ok(View::Week),
            "day" => Ok(View::Day),
            "year" => Ok(View::Year),
            _ => Err(format!("Unknown view '{}'. Expected month, week, day or year", s)),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            View::Month => "month",
            View::Week => "week",
            View::Day => "day",
            View::Year => "year",
        };
        write!(f, "{}", name)
    }
}

/// What the event form is doing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FormMode {
    #[default]
    Closed,
    Adding {
        date: NaiveDate,
        /// Start time pre-filled when the form was opened from a day slot
        preset: Option<TimeOfDay>,
    },
    Editing {
        id: String,
        origin: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub view: View,
    /// Always the first day of a month
    pub visible_month: NaiveDate,
    pub selected_date: NaiveDate,
    #[serde(default)]
    pub form: FormMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Prev,
    Next,
    Today(NaiveDate),
    JumpToMonth(NaiveDate),
    GoTo(NaiveDate),
    SetView(View),
    SelectDate(NaiveDate),
    /// A day picked in the year overview: select it and open it in day view
    PickYearDay(NaiveDate),
    OpenAdd { preset: Option<TimeOfDay> },
    OpenEdit { id: String, origin: String },
    CloseForm,
}

impl AppState {
    pub fn new(today: NaiveDate) -> Self {
        AppState {
            view: View::Month,
            visible_month: start_of_month(today),
            selected_date: today,
            form: FormMode::Closed,
        }
    }

    pub fn apply(self, action: Action) -> AppState {
        let mut next = self;

        match action {
            Action::Prev => next.step(-1),
            Action::Next => next.step(1),
            Action::Today(today) => {
                next.visible_month = start_of_month(today);
                next.selected_date = today;
            }
            Action::JumpToMonth(month) => next.visible_month = start_of_month(month),
            Action::GoTo(date) => {
                next.visible_month = start_of_month(date);
                next.selected_date = date;
            }
            Action::SetView(view) => next.view = view,
            Action::SelectDate(date) => next.selected_date = date,
            Action::PickYearDay(date) => {
                next.visible_month = start_of_month(date);
                next.selected_date = date;
                next.view = View::Day;
            }
            Action::OpenAdd { preset } => {
                next.form = FormMode::Adding {
                    date: next.selected_date,
                    preset,
                };
            }
            Action::OpenEdit { id, origin } => next.form = FormMode::Editing { id, origin },
            Action::CloseForm => next.form = FormMode::Closed,
        }

        next
    }

    /// Move one unit of the current view backwards (`-1`) or forwards (`1`).
    fn step(&mut self, delta: i32) {
        match self.view {
            View::Month => self.visible_month = shift_months(self.visible_month, delta),
            View::Year => self.visible_month = shift_months(self.visible_month, 12 * delta),
            View::Week | View::Day => {
                let days = if self.view == View::Week { 7 } else { 1 };
                self.selected_date += Duration::days(i64::from(days * delta));
                self.visible_month = start_of_month(self.selected_date);
            }
        }
    }

    /// Load the persisted state; anything unreadable starts over at `today`.
    pub fn load(storage: &impl Storage, today: NaiveDate) -> AppState {
        match storage.get(STATE_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable view state: {}", e);
                AppState::new(today)
            }),
            Ok(None) => AppState::new(today),
            Err(e) => {
                log::warn!("Could not read view state: {}", e);
                AppState::new(today)
            }
        }
    }

    pub fn save(&self, storage: &mut impl Storage) -> AlmanacResult<()> {
        let raw = serde_json::to_string(self)?;
        storage.set(STATE_KEY, &raw)
    }
}

// =============================================================================
// Form submission
// =============================================================================

/// Values entered in the event form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormInput {
    pub text: String,
    pub is_all_day: bool,
    pub start_time: Option<TimeOfDay>,
    pub end_time: Option<TimeOfDay>,
    pub color: EventColor,
    pub repeat: Repeat,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    /// Blank text: nothing stored, form left open
    Ignored,
    Added(Event),
    Updated(Event),
}

/// Submit the event form, adding or editing depending on the form mode.
///
/// Returns the next state (form closed on success) with what happened.
pub fn submit_form<S: Storage>(
    store: &mut EventStore<S>,
    state: AppState,
    input: FormInput,
) -> AlmanacResult<(AppState, FormOutcome)> {
    let text = input.text.trim().to_string();
    if text.is_empty() {
        return Ok((state, FormOutcome::Ignored));
    }

    let (start_time, end_time) = if input.is_all_day {
        (None, None)
    } else {
        (input.start_time, input.end_time)
    };
    if end_time.is_some() && start_time.is_none() {
        return Err(AlmanacError::InvalidTimeRange);
    }

    let outcome = match &state.form {
        FormMode::Closed => return Err(AlmanacError::FormClosed),
        FormMode::Adding { date, .. } => {
            let options = EventOptions {
                is_all_day: input.is_all_day,
                start_time,
                end_time,
                color: input.color,
                repeat: input.repeat,
            };
            let mut day = store.add(&iso_key(*date), &text, options)?;
            let added = day.pop().ok_or_else(|| AlmanacError::EventNotFound(text.clone()))?;
            FormOutcome::Added(added)
        }
        FormMode::Editing { id, origin } => {
            let patch = EventPatch {
                text: Some(text),
                is_all_day: Some(input.is_all_day),
                start_time: Some(start_time),
                end_time: Some(end_time),
                color: Some(input.color),
                repeat: Some(input.repeat),
                new_date: None,
            };
            match store.update(origin, id, &patch)? {
                Some(UpdateOutcome::Edited(event)) => FormOutcome::Updated(event),
                Some(UpdateOutcome::Moved { .. }) | None => {
                    return Err(AlmanacError::EventNotFound(id.clone()));
                }
            }
        }
    };

    Ok((state.apply(Action::CloseForm), outcome))
}
