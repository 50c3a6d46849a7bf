use almanac_core::date::{iso_key, parse_iso_key};
use almanac_core::event::EventPatch;
use almanac_core::event::TimeOfDay;
use almanac_core::reschedule::{reschedule, slot_of, snap_fraction};
use almanac_core::UpdateOutcome;
use anyhow::{Result, bail};
use owo_colors::OwoColorize;

use crate::app::App;
use crate::commands::args::parse_time;

/// Where on the target day the event lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot<'a> {
    /// Keep the event's times
    Keep,
    /// A clock time, e.g. "14:10"
    Time(&'a str),
    /// A position down the day column
    Fraction(f32),
}

impl<'a> Slot<'a> {
    pub fn from_args(at: Option<&'a str>, at_fraction: Option<f32>) -> Self {
        match (at, at_fraction) {
            (Some(at), _) => Slot::Time(at),
            (None, Some(fraction)) => Slot::Fraction(fraction),
            (None, None) => Slot::Keep,
        }
    }

    fn resolve(self) -> Result<Option<TimeOfDay>> {
        Ok(match self {
            Slot::Keep => None,
            Slot::Time(at) => Some(slot_of(parse_time(at)?)),
            Slot::Fraction(fraction) => Some(snap_fraction(fraction)),
        })
    }
}

/// Drop an event on another day, optionally on a half-hour slot.
pub fn run(app: &App, id: &str, to: &str, slot: Slot) -> Result<()> {
    let mut store = app.store();
    let (origin, event) = store.find_by_prefix(id)?;
    let target = parse_iso_key(to)?;

    let outcome = match slot.resolve()? {
        Some(slot) => reschedule(&mut store, &origin, &event.id, target, slot)?,
        None => {
            let patch = EventPatch {
                new_date: (iso_key(target) != origin).then_some(target),
                ..Default::default()
            };
            store.update(&origin, &event.id, &patch)?
        }
    };

    let Some(outcome) = outcome else {
        bail!("Event not found: {}", id);
    };

    match outcome {
        UpdateOutcome::Moved { previous, to } => {
            let time = store.find(&event.id).map(|(_, e)| e.time_label()).unwrap_or_default();
            println!(
                "{}",
                format!("  Moved: {} from {} to {} {}", previous.text, previous.origin, to, time).green()
            );
        }
        UpdateOutcome::Edited(e) => println!(
            "{}",
            format!("  Rescheduled: {} on {} {}", e.text, e.origin, e.time_label()).green()
        ),
    }

    Ok(())
}
