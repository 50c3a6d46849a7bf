use almanac_core::date::{day_title, iso_key, parse_iso_key};
use almanac_core::hijri::hijri_label;
use almanac_core::recurrence::events_for_display;
use anyhow::Result;
use owo_colors::OwoColorize;

use crate::app::App;
use crate::render::event_line;

pub fn run(app: &App, date: Option<&str>) -> Result<()> {
    let date = match date {
        Some(d) => parse_iso_key(d)?,
        None => app.state().selected_date,
    };

    let all = app.store().load_all();
    let events = events_for_display(&all, date);

    println!("{}  {}", day_title(date).bold(), hijri_label(date).dimmed());

    if events.is_empty() {
        println!("{}", "  No events".dimmed());
        return Ok(());
    }

    let key = iso_key(date);
    for event in &events {
        if event.is_projection(&key) {
            println!("{} {}", event_line(event), format!("from {}", event.origin_iso).dimmed());
        } else {
            println!("{}", event_line(event));
        }
    }

    Ok(())
}
