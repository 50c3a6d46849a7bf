//! Recurring event resolution.
//!
//! An event recurs forward from the date it is filed under. Showing a day
//! means merging the events filed on it with every recurring event from other
//! dates that lands on it, then ordering the result for display.
//!
//! Resolution scans the whole store for every displayed day.

use chrono::{Datelike, NaiveDate};

use crate::date::{iso_key, parse_iso_key};
use crate::event::{DisplayEvent, Repeat};
use crate::store::EventMap;

/// Does an event filed on `origin` with the given repeat mode also occur on `target`?
///
/// Monthly recurrence compares the day of month only, so an origin on the 31st
/// skips every month without a 31st. Yearly recurrence compares month and day,
/// so a Feb 29 origin only shows in leap years.
pub fn matches(origin: NaiveDate, target: NaiveDate, repeat: Repeat) -> bool {
    if repeat == Repeat::None || target < origin {
        return false;
    }

    match repeat {
        Repeat::None => false,
        Repeat::Daily => true,
        Repeat::Weekly => origin.weekday() == target.weekday(),
        Repeat::Monthly => origin.day() == target.day(),
        Repeat::Yearly => origin.month() == target.month() && origin.day() == target.day(),
    }
}

/// Every event to show on `target`: events filed on it first, then recurring
/// matches from other dates, ordered by [`display_rank`].
pub fn events_for_display(all: &EventMap, target: NaiveDate) -> Vec<DisplayEvent> {
    let target_key = iso_key(target);

    let direct = all
        .get(&target_key)
        .into_iter()
        .flatten()
        .map(|event| DisplayEvent {
            event: event.clone(),
            origin_iso: target_key.clone(),
        });

    let mut recurring = Vec::new();
    for (key, events) in all {
        if *key == target_key {
            continue;
        }
        if !events.iter().any(|e| e.is_recurring()) {
            continue;
        }

        let origin = match parse_iso_key(key) {
            Ok(origin) => origin,
            Err(_) => {
                log::debug!("Skipping recurrence for unparseable key '{}'", key);
                continue;
            }
        };

        recurring.extend(
            events
                .iter()
                .filter(|e| matches(origin, target, e.repeat))
                .map(|event| DisplayEvent {
                    event: event.clone(),
                    origin_iso: key.clone(),
                }),
        );
    }

    let mut combined: Vec<DisplayEvent> = direct.chain(recurring).collect();
    // sort_by_key is stable: ties keep direct-before-recurring and insertion order
    combined.sort_by_key(display_rank);
    combined
}

/// All-day first, then timed events by start, then events with neither.
fn display_rank(event: &DisplayEvent) -> (u8, u16) {
    let event = &event.event;

    if event.is_all_day {
        return (0, 0);
    }
    match event.start_minutes() {
        Some(minutes) => (1, minutes),
        None => (2, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, EventOptions, TimeOfDay};

    fn date(s: &str) -> NaiveDate {
        parse_iso_key(s).unwrap()
    }

    fn event(origin: &str, text: &str, repeat: Repeat) -> Event {
        Event::new(origin, text, EventOptions { repeat, ..Default::default() })
    }

    fn timed(origin: &str, text: &str, start: &str) -> Event {
        Event::new(
            origin,
            text,
            EventOptions {
                start_time: Some(start.parse::<TimeOfDay>().unwrap()),
                ..Default::default()
            },
        )
    }

    fn all_day(origin: &str, text: &str) -> Event {
        Event::new(origin, text, EventOptions { is_all_day: true, ..Default::default() })
    }

    fn map(entries: Vec<Event>) -> EventMap {
        let mut map = EventMap::new();
        for e in entries {
            map.entry(e.origin.clone()).or_default().push(e);
        }
        map
    }

    fn texts(events: &[DisplayEvent]) -> Vec<&str> {
        events.iter().map(|e| e.event.text.as_str()).collect()
    }

    #[test]
    fn none_never_matches() {
        let d = date("2024-01-15");
        assert!(!matches(d, d, Repeat::None));
        assert!(!matches(d, date("2024-01-16"), Repeat::None));
    }

    #[test]
    fn never_projects_backwards() {
        let origin = date("2024-01-15");
        for repeat in [Repeat::Daily, Repeat::Weekly, Repeat::Monthly, Repeat::Yearly] {
            assert!(!matches(origin, date("2023-01-15"), repeat));
            assert!(!matches(origin, date("2024-01-14"), repeat));
        }
    }

    #[test]
    fn daily_weekly() {
        let origin = date("2024-01-15"); // Monday
        assert!(matches(origin, date("2024-03-02"), Repeat::Daily));
        assert!(matches(origin, date("2024-01-22"), Repeat::Weekly));
        assert!(!matches(origin, date("2024-01-23"), Repeat::Weekly));
    }

    #[test]
    fn monthly_matches_day_of_month_only() {
        let origin = date("2024-01-15");
        assert!(matches(origin, date("2024-02-15"), Repeat::Monthly));
        assert!(matches(origin, date("2024-03-15"), Repeat::Monthly));
        assert!(!matches(origin, date("2024-02-14"), Repeat::Monthly));

        // the 31st skips short months entirely
        let end_of_month = date("2024-01-31");
        assert!(!matches(end_of_month, date("2024-02-29"), Repeat::Monthly));
        assert!(!matches(end_of_month, date("2024-04-30"), Repeat::Monthly));
        assert!(matches(end_of_month, date("2024-03-31"), Repeat::Monthly));
    }

    #[test]
    fn yearly_has_no_leap_adjustment() {
        let leap_day = date("2024-02-29");
        assert!(!matches(leap_day, date("2025-02-28"), Repeat::Yearly));
        assert!(!matches(leap_day, date("2025-03-01"), Repeat::Yearly));
        assert!(matches(leap_day, date("2028-02-29"), Repeat::Yearly));
        assert!(!matches(date("2024-01-15"), date("2025-02-15"), Repeat::Yearly));
    }

    #[test]
    fn monthly_example_from_origin() {
        let all = map(vec![event("2024-01-15", "Rent", Repeat::Monthly)]);

        assert_eq!(texts(&events_for_display(&all, date("2024-02-15"))), vec!["Rent"]);
        assert_eq!(texts(&events_for_display(&all, date("2024-03-15"))), vec!["Rent"]);
        assert!(events_for_display(&all, date("2024-02-14")).is_empty());
        assert!(events_for_display(&all, date("2023-12-15")).is_empty());
    }

    #[test]
    fn direct_events_tagged_with_target_and_projections_with_origin() {
        let all = map(vec![
            event("2024-01-22", "Direct", Repeat::None),
            event("2024-01-15", "Weekly", Repeat::Weekly),
        ]);

        let shown = events_for_display(&all, date("2024-01-22"));
        assert_eq!(texts(&shown), vec!["Direct", "Weekly"]);
        assert_eq!(shown[0].origin_iso, "2024-01-22");
        assert_eq!(shown[1].origin_iso, "2024-01-15");
        assert!(shown[1].is_projection("2024-01-22"));
    }

    #[test]
    fn recurring_event_is_not_duplicated_on_its_origin() {
        let all = map(vec![event("2024-01-15", "Daily", Repeat::Daily)]);
        let shown = events_for_display(&all, date("2024-01-15"));
        assert_eq!(shown.len(), 1);
    }

    #[test]
    fn never_drops_direct_or_invents_events() {
        let all = map(vec![
            event("2024-01-15", "A", Repeat::None),
            event("2024-01-15", "B", Repeat::Monthly),
            event("2024-01-10", "Unrelated", Repeat::None),
            event("2024-01-11", "Weekly Thursday", Repeat::Weekly),
        ]);

        let shown = events_for_display(&all, date("2024-01-15"));
        assert_eq!(texts(&shown), vec!["A", "B"]);

        let stored_ids: Vec<&str> = all.values().flatten().map(|e| e.id.as_str()).collect();
        assert!(shown.iter().all(|e| stored_ids.contains(&e.event.id.as_str())));
    }

    #[test]
    fn all_day_events_sort_before_timed() {
        let all = map(vec![
            timed("2024-01-15", "Timed", "08:00"),
            all_day("2024-01-15", "First all-day"),
            all_day("2024-01-15", "Second all-day"),
        ]);

        let shown = events_for_display(&all, date("2024-01-15"));
        assert_eq!(texts(&shown), vec!["First all-day", "Second all-day", "Timed"]);
    }

    #[test]
    fn all_day_order_holds_wherever_the_timed_event_sits() {
        let layouts = [
            vec![
                all_day("2024-01-15", "First all-day"),
                timed("2024-01-15", "Timed", "08:00"),
                all_day("2024-01-15", "Second all-day"),
            ],
            vec![
                all_day("2024-01-15", "First all-day"),
                all_day("2024-01-15", "Second all-day"),
                timed("2024-01-15", "Timed", "08:00"),
            ],
        ];

        for entries in layouts {
            let shown = events_for_display(&map(entries), date("2024-01-15"));
            assert_eq!(texts(&shown), vec!["First all-day", "Second all-day", "Timed"]);
        }
    }

    #[test]
    fn projected_all_day_events_follow_direct_ones() {
        let all = map(vec![
            Event::new("2024-01-01", "Monthly all-day", EventOptions {
                is_all_day: true,
                repeat: Repeat::Monthly,
                ..Default::default()
            }),
            timed("2024-01-15", "Timed", "07:00"),
            all_day("2024-01-15", "Direct all-day"),
        ]);

        let shown = events_for_display(&all, date("2024-01-15"));
        assert_eq!(texts(&shown), vec!["Direct all-day", "Monthly all-day", "Timed"]);
    }

    #[test]
    fn timed_by_start_then_unscheduled_last() {
        let all = map(vec![
            event("2024-01-15", "No time", Repeat::None),
            timed("2024-01-15", "Afternoon", "14:30"),
            timed("2024-01-15", "Morning", "09:15"),
            all_day("2024-01-15", "Holiday"),
        ]);

        let shown = events_for_display(&all, date("2024-01-15"));
        assert_eq!(texts(&shown), vec!["Holiday", "Morning", "Afternoon", "No time"]);
    }

    #[test]
    fn unparseable_keys_are_skipped() {
        let mut all = map(vec![event("2024-01-15", "Fine", Repeat::Daily)]);
        all.insert(
            "garbage".to_string(),
            vec![event("garbage", "Broken", Repeat::Daily)],
        );

        let shown = events_for_display(&all, date("2024-01-16"));
        assert_eq!(texts(&shown), vec!["Fine"]);
    }
}
