//! Layout models for the four calendar views.
//!
//! Building a view only reads the event map; turning it into terminal output
//! is the CLI's job.

use chrono::{Datelike, Duration, NaiveDate};

use crate::date::{
    day_title, days_between, grid_end, grid_start, is_same_day, iso_key, month_title,
    start_of_month, start_of_week, MONTH_NAMES,
};
use crate::event::{DisplayEvent, DEFAULT_DURATION_MINUTES};
use crate::hijri::hijri_label;
use crate::recurrence::events_for_display;
use crate::state::{AppState, View};
use crate::store::EventMap;

pub const SLOT_MINUTES: u16 = 30;
pub const SLOTS_PER_DAY: usize = 48;
const MINUTES_PER_DAY: f32 = 24.0 * 60.0;

/// Number of events previewed inside a month cell.
const MONTH_PREVIEW_LIMIT: usize = 2;

pub const YEAR_WEEKDAY_HEADER: [&str; 7] = ["S", "M", "T", "W", "T", "F", "S"];

/// Header line for the current view.
pub fn title(state: &AppState) -> String {
    match state.view {
        View::Month => month_title(state.visible_month),
        View::Week => format!("Week of {}", day_title(start_of_week(state.selected_date))),
        View::Day => day_title(state.selected_date),
        View::Year => state.visible_month.year().to_string(),
    }
}

// =============================================================================
// Month grid
// =============================================================================

#[derive(Debug, Clone)]
pub struct MonthGrid {
    pub month: NaiveDate,
    /// Sunday-first, always a multiple of seven cells
    pub cells: Vec<DayCell>,
}

impl MonthGrid {
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks(7)
    }
}

#[derive(Debug, Clone)]
pub struct DayCell {
    pub date: NaiveDate,
    pub in_month: bool,
    pub is_today: bool,
    pub is_selected: bool,
    pub hijri: String,
    /// Events filed directly on this date
    pub event_count: usize,
    pub previews: Vec<Preview>,
}

impl DayCell {
    /// "1 event" / "3 events"
    pub fn pill(&self) -> String {
        if self.event_count == 1 {
            "1 event".to_string()
        } else {
            format!("{} events", self.event_count)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    /// "HH:MM text" for timed events, the bare text otherwise
    pub label: String,
    pub event: DisplayEvent,
}

pub fn month_grid(all: &EventMap, month: NaiveDate, selected: NaiveDate, today: NaiveDate) -> MonthGrid {
    let month = start_of_month(month);

    let cells = days_between(grid_start(month), grid_end(month))
        .map(|date| {
            let previews = events_for_display(all, date)
                .into_iter()
                .take(MONTH_PREVIEW_LIMIT)
                .map(|event| {
                    let label = match event.event.start_time {
                        Some(start) => format!("{} {}", start, event.event.text),
                        None => event.event.text.clone(),
                    };
                    Preview { label, event }
                })
                .collect();

            DayCell {
                date,
                in_month: date.month() == month.month(),
                is_today: is_same_day(&date, &today),
                is_selected: is_same_day(&date, &selected),
                hijri: hijri_label(date),
                event_count: all.get(&iso_key(date)).map_or(0, Vec::len),
                previews,
            }
        })
        .collect();

    MonthGrid { month, cells }
}

// =============================================================================
// Day timeline
// =============================================================================

#[derive(Debug, Clone)]
pub struct DayTimeline {
    pub date: NaiveDate,
    pub all_day: Vec<DisplayEvent>,
    pub slots: Vec<Slot>,
    /// Neither all-day nor timed
    pub unscheduled: Vec<DisplayEvent>,
}

#[derive(Debug, Clone)]
pub struct Slot {
    pub start_minute: u16,
    pub events: Vec<DisplayEvent>,
}

impl Slot {
    pub fn label(&self) -> String {
        format!("{:02}:{:02}", self.start_minute / 60, self.start_minute % 60)
    }
}

pub fn day_timeline(all: &EventMap, date: NaiveDate) -> DayTimeline {
    let events = events_for_display(all, date);

    let slots = (0..SLOTS_PER_DAY as u16)
        .map(|i| {
            let slot_start = i * SLOT_MINUTES;
            let slot_end = slot_start + SLOT_MINUTES;
            let events = events
                .iter()
                .filter(|e| !e.event.is_all_day)
                .filter(|e| match (e.event.start_minutes(), e.event.end_minutes()) {
                    (Some(start), Some(end)) => slot_start < end && slot_end > start,
                    _ => false,
                })
                .cloned()
                .collect();

            Slot {
                start_minute: slot_start,
                events,
            }
        })
        .collect();

    let (all_day, rest): (Vec<_>, Vec<_>) = events.into_iter().partition(|e| e.event.is_all_day);
    let unscheduled = rest
        .into_iter()
        .filter(|e| e.event.start_time.is_none())
        .collect();

    DayTimeline {
        date,
        all_day,
        slots,
        unscheduled,
    }
}

// =============================================================================
// Week timeline
// =============================================================================

#[derive(Debug, Clone)]
pub struct WeekTimeline {
    /// Monday
    pub start: NaiveDate,
    pub days: Vec<WeekDay>,
}

#[derive(Debug, Clone)]
pub struct WeekDay {
    pub date: NaiveDate,
    /// "Mon 15"
    pub header: String,
    pub all_day: Vec<DisplayEvent>,
    pub timed: Vec<WeekChip>,
}

/// A timed event placed in a day column.
#[derive(Debug, Clone)]
pub struct WeekChip {
    pub event: DisplayEvent,
    /// Fraction of the day where the chip starts
    pub top: f32,
    /// Fraction of the day the chip covers, at least half an hour
    pub height: f32,
}

pub fn week_timeline(all: &EventMap, selected: NaiveDate) -> WeekTimeline {
    let start = start_of_week(selected);

    let days = (0..7)
        .map(|offset| {
            let date = start + Duration::days(offset);
            let mut all_day = Vec::new();
            let mut timed = Vec::new();

            for event in events_for_display(all, date) {
                if event.event.is_all_day {
                    all_day.push(event);
                    continue;
                }
                let (Some(begin), Some(end)) = (event.event.start_minutes(), event.event.end_minutes()) else {
                    continue;
                };
                let duration = end.saturating_sub(begin).max(DEFAULT_DURATION_MINUTES);

                timed.push(WeekChip {
                    top: f32::from(begin) / MINUTES_PER_DAY,
                    height: f32::from(duration) / MINUTES_PER_DAY,
                    event,
                });
            }

            WeekDay {
                date,
                header: date.format("%a %-d").to_string(),
                all_day,
                timed,
            }
        })
        .collect();

    WeekTimeline { start, days }
}

// =============================================================================
// Year overview
// =============================================================================

#[derive(Debug, Clone)]
pub struct YearOverview {
    pub year: i32,
    pub months: Vec<MiniMonth>,
}

#[derive(Debug, Clone)]
pub struct MiniMonth {
    pub name: &'static str,
    /// Sunday-first, out-of-month days included
    pub days: Vec<MiniDay>,
}

#[derive(Debug, Clone, Copy)]
pub struct MiniDay {
    pub date: NaiveDate,
    pub muted: bool,
    pub has_events: bool,
}

pub fn year_overview(all: &EventMap, year: i32) -> YearOverview {
    let months = (1..=12)
        .filter_map(|month| NaiveDate::from_ymd_opt(year, month, 1))
        .map(|first| {
            let days = days_between(grid_start(first), grid_end(first))
                .map(|date| MiniDay {
                    date,
                    muted: date.month() != first.month(),
                    has_events: !events_for_display(all, date).is_empty(),
                })
                .collect();

            MiniMonth {
                name: MONTH_NAMES[first.month0() as usize],
                days,
            }
        })
        .collect();

    YearOverview { year, months }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::parse_iso_key;
    use crate::event::{Event, EventOptions, Repeat, TimeOfDay};
    use crate::state::FormMode;

    fn date(s: &str) -> NaiveDate {
        parse_iso_key(s).unwrap()
    }

    fn time(s: &str) -> Option<TimeOfDay> {
        Some(s.parse().unwrap())
    }

    fn insert(all: &mut EventMap, origin: &str, text: &str, options: EventOptions) {
        all.entry(origin.to_string())
            .or_default()
            .push(Event::new(origin, text, options));
    }

    #[test]
    fn month_grid_marks_cells() {
        let mut all = EventMap::new();
        insert(&mut all, "2024-03-05", "Dentist", EventOptions {
            start_time: time("09:30"),
            ..Default::default()
        });
        insert(&mut all, "2024-03-05", "Lunch", EventOptions::default());
        insert(&mut all, "2024-03-05", "Call", EventOptions::default());

        let grid = month_grid(&all, date("2024-03-20"), date("2024-03-05"), date("2024-03-06"));
        assert_eq!(grid.cells.len(), 42);
        assert_eq!(grid.weeks().count(), 6);
        assert!(!grid.cells[0].in_month);

        let cell = grid.cells.iter().find(|c| c.date == date("2024-03-05")).unwrap();
        assert!(cell.is_selected);
        assert!(!cell.is_today);
        assert_eq!(cell.pill(), "3 events");
        assert_eq!(cell.previews.len(), 2);
        assert_eq!(cell.previews[0].label, "09:30 Dentist");
        assert_eq!(cell.previews[1].label, "Lunch");
    }

    #[test]
    fn pill_counts_direct_events_only() {
        let mut all = EventMap::new();
        insert(&mut all, "2024-03-01", "Standup", EventOptions {
            repeat: Repeat::Daily,
            ..Default::default()
        });

        let grid = month_grid(&all, date("2024-03-01"), date("2024-03-01"), date("2024-03-01"));
        let cell = grid.cells.iter().find(|c| c.date == date("2024-03-02")).unwrap();
        assert_eq!(cell.pill(), "0 events");
        assert_eq!(cell.previews.len(), 1);
    }

    #[test]
    fn day_timeline_places_overlapping_slots() {
        let mut all = EventMap::new();
        insert(&mut all, "2024-03-05", "Meeting", EventOptions {
            start_time: time("09:15"),
            end_time: time("10:00"),
            ..Default::default()
        });
        insert(&mut all, "2024-03-05", "Quick", EventOptions {
            start_time: time("13:00"),
            ..Default::default()
        });
        insert(&mut all, "2024-03-05", "Holiday", EventOptions {
            is_all_day: true,
            ..Default::default()
        });
        insert(&mut all, "2024-03-05", "Someday", EventOptions::default());

        let day = day_timeline(&all, date("2024-03-05"));
        assert_eq!(day.slots.len(), SLOTS_PER_DAY);

        let occupied: Vec<String> = day
            .slots
            .iter()
            .filter(|s| !s.events.is_empty())
            .map(Slot::label)
            .collect();
        assert_eq!(occupied, vec!["09:00", "09:30", "13:00"]);

        assert_eq!(day.all_day.len(), 1);
        assert_eq!(day.unscheduled.len(), 1);
        assert_eq!(day.unscheduled[0].event.text, "Someday");
    }

    #[test]
    fn week_timeline_starts_monday_with_min_height() {
        let mut all = EventMap::new();
        insert(&mut all, "2024-03-06", "Short", EventOptions {
            start_time: time("12:00"),
            end_time: time("12:10"),
            ..Default::default()
        });

        let week = week_timeline(&all, date("2024-03-07"));
        assert_eq!(week.start, date("2024-03-04"));
        assert_eq!(week.days.len(), 7);
        assert_eq!(week.days[0].header, "Mon 4");

        let chip = &week.days[2].timed[0];
        assert!((chip.top - 0.5).abs() < f32::EPSILON);
        assert!((chip.height - 30.0 / 1440.0).abs() < 1e-6);
    }

    #[test]
    fn year_overview_flags_days_with_events() {
        let mut all = EventMap::new();
        insert(&mut all, "2024-07-04", "Picnic", EventOptions::default());

        let year = year_overview(&all, 2024);
        assert_eq!(year.months.len(), 12);
        assert_eq!(year.months[6].name, "July");

        let flagged: Vec<NaiveDate> = year
            .months
            .iter()
            .flat_map(|m| m.days.iter())
            .filter(|d| d.has_events && !d.muted)
            .map(|d| d.date)
            .collect();
        assert_eq!(flagged, vec![date("2024-07-04")]);
    }

    #[test]
    fn titles_follow_the_view() {
        let mut state = AppState::new(date("2024-01-17"));
        assert_eq!(title(&state), "January 2024");

        state.view = View::Week;
        assert_eq!(title(&state), "Week of January 15, 2024");

        state.view = View::Day;
        assert_eq!(title(&state), "January 17, 2024");

        state.view = View::Year;
        assert_eq!(title(&state), "2024");
        assert_eq!(state.form, FormMode::Closed);
    }
}
