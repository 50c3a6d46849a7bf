//! Drag-and-drop rescheduling.
//!
//! Dropping an event on a half-hour slot keeps its duration. Dropping on
//! another date moves it there.

use chrono::NaiveDate;

use crate::date::iso_key;
use crate::error::AlmanacResult;
use crate::event::{Event, EventPatch, TimeOfDay};
use crate::storage::Storage;
use crate::store::{EventStore, UpdateOutcome};
use crate::view::SLOT_MINUTES;

/// Last slot a drop can snap to (23:30).
const LAST_SLOT_START: u16 = 24 * 60 - SLOT_MINUTES;

/// Patch that puts `event` at `slot_start` on `target`, keeping its duration.
///
/// The end is clamped to 23:59. The result is always timed. `new_date` is only
/// set when the date changes.
pub fn drop_patch(event: &Event, origin: &str, target: NaiveDate, slot_start: TimeOfDay) -> EventPatch {
    let start = slot_start.minutes();
    let end = TimeOfDay::from_minutes(start + event.duration_minutes());
    let target_key = iso_key(target);

    EventPatch {
        is_all_day: Some(false),
        start_time: Some(Some(slot_start)),
        end_time: Some(Some(end)),
        new_date: (target_key != origin).then_some(target),
        ..Default::default()
    }
}

/// Minute of the day for a drop at `fraction` (0.0 top, 1.0 bottom) of a week
/// column, snapped to the nearest half hour.
pub fn snap_fraction(fraction: f32) -> TimeOfDay {
    let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
    let minute = fraction * 24.0 * 60.0;
    let snapped = (minute / f32::from(SLOT_MINUTES)).round() as u16 * SLOT_MINUTES;

    TimeOfDay::from_minutes(snapped.min(LAST_SLOT_START))
}

/// Snap an arbitrary time to the start of its half-hour slot.
pub fn slot_of(time: TimeOfDay) -> TimeOfDay {
    TimeOfDay::from_minutes(time.minutes() / SLOT_MINUTES * SLOT_MINUTES)
}

/// Move the event `id` filed under `origin` to `slot_start` on `target`.
///
/// Returns `None` when the event does not exist.
pub fn reschedule<S: Storage>(
    store: &mut EventStore<S>,
    origin: &str,
    id: &str,
    target: NaiveDate,
    slot_start: TimeOfDay,
) -> AlmanacResult<Option<UpdateOutcome>> {
    let Some(event) = store.events_for_date(origin).into_iter().find(|e| e.id == id) else {
        return Ok(None);
    };

    let patch = drop_patch(&event, origin, target, slot_start);
    store.update(origin, id, &patch)
}
