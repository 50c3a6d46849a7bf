//! Terminal rendering for almanac views.
//!
//! The core crate builds layout models; this module turns them into
//! colored text using owo_colors.

use almanac_core::date::day_title;
use almanac_core::event::{DisplayEvent, EventColor};
use almanac_core::hijri::hijri_label;
use almanac_core::settings::Theme;
use almanac_core::view::{
    DayCell, DayTimeline, MiniMonth, MonthGrid, WeekTimeline, YearOverview, YEAR_WEEKDAY_HEADER,
};
use chrono::{Datelike, NaiveDate};
use owo_colors::OwoColorize;

/// Width of one month grid column.
const CELL_WIDTH: usize = 14;

/// Slots shown in the day view even when empty.
const DAY_HOURS: std::ops::Range<u16> = 7 * 60..19 * 60;

/// Width of the 24 hour strip drawn for week chips.
const STRIP_WIDTH: usize = 24;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// What rendering needs besides the model itself.
pub struct Style {
    pub theme: Theme,
    pub today: NaiveDate,
}

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self, style: &Style) -> String;
}

/// Paint `text` in an event's color tag.
pub fn paint(text: &str, color: EventColor) -> String {
    match color {
        EventColor::Default => text.to_string(),
        EventColor::Red => text.red().to_string(),
        EventColor::Orange => text.truecolor(255, 140, 0).to_string(),
        EventColor::Yellow => text.yellow().to_string(),
        EventColor::Green => text.green().to_string(),
        EventColor::Blue => text.blue().to_string(),
        EventColor::Purple => text.magenta().to_string(),
        EventColor::Gray => text.bright_black().to_string(),
    }
}

/// Mark the selected day.
fn highlight(text: &str, theme: Theme) -> String {
    match theme {
        Theme::Dark => text.reversed().to_string(),
        Theme::Light => text.bold().underline().to_string(),
    }
}

/// Mark today.
fn accent(text: &str, theme: Theme) -> String {
    match theme {
        Theme::Dark => text.yellow().bold().to_string(),
        Theme::Light => text.blue().bold().to_string(),
    }
}

/// Cut `text` to `width` characters and pad it to exactly that width.
pub fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return format!("{}{}", text, " ".repeat(width - count));
    }

    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// First eight characters of an event id, enough to address it.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// One line per event: time, colored text, repeat marker and id.
pub fn event_line(event: &DisplayEvent) -> String {
    let e = &event.event;
    let time = e.time_label();
    let repeat = if e.is_recurring() { " ⟳" } else { "" };
    let id = format!("[{}]", short_id(&e.id));

    format!(
        "  {} {}{} {}",
        fit(&time, 13).dimmed(),
        paint(&e.text, e.color),
        repeat,
        id.dimmed()
    )
}

/// A day strip where the chip covers `top..top + height` of `width` columns.
pub fn strip(top: f32, height: f32, width: usize) -> String {
    let start = ((top * width as f32).floor() as usize).min(width.saturating_sub(1));
    let len = ((height * width as f32).round() as usize).max(1).min(width - start);

    format!("{}{}{}", "·".repeat(start), "█".repeat(len), "·".repeat(width - start - len))
}

fn cell_number(cell: &DayCell, theme: Theme) -> String {
    let number = fit(&format!("{:>2}", cell.date.day()), CELL_WIDTH);

    if cell.is_selected {
        highlight(&number, theme)
    } else if cell.is_today {
        accent(&number, theme)
    } else if !cell.in_month {
        number.dimmed().to_string()
    } else {
        number
    }
}

impl Render for MonthGrid {
    fn render(&self, style: &Style) -> String {
        let mut lines = Vec::new();

        lines.push(
            WEEKDAYS
                .iter()
                .map(|d| fit(d, CELL_WIDTH).bold().to_string())
                .collect::<Vec<_>>()
                .join(" "),
        );

        for week in self.weeks() {
            lines.push(
                week.iter()
                    .map(|cell| cell_number(cell, style.theme))
                    .collect::<Vec<_>>()
                    .join(" "),
            );
            lines.push(
                week.iter()
                    .map(|cell| fit(&cell.hijri, CELL_WIDTH).dimmed().to_string())
                    .collect::<Vec<_>>()
                    .join(" "),
            );

            if week.iter().any(|cell| cell.event_count > 0) {
                lines.push(
                    week.iter()
                        .map(|cell| {
                            if cell.event_count == 0 {
                                fit("", CELL_WIDTH)
                            } else {
                                fit(&cell.pill(), CELL_WIDTH).cyan().to_string()
                            }
                        })
                        .collect::<Vec<_>>()
                        .join(" "),
                );
            }

            let preview_rows = week.iter().map(|cell| cell.previews.len()).max().unwrap_or(0);
            for row in 0..preview_rows {
                lines.push(
                    week.iter()
                        .map(|cell| match cell.previews.get(row) {
                            Some(preview) => paint(&fit(&preview.label, CELL_WIDTH), preview.event.event.color),
                            None => fit("", CELL_WIDTH),
                        })
                        .collect::<Vec<_>>()
                        .join(" "),
                );
            }

            lines.push(String::new());
        }

        lines.join("\n")
    }
}

impl Render for DayTimeline {
    fn render(&self, _style: &Style) -> String {
        let mut lines = Vec::new();
        lines.push(format!("{}  {}", day_title(self.date).bold(), hijri_label(self.date).dimmed()));

        if !self.all_day.is_empty() {
            lines.push("All day".dimmed().to_string());
            lines.extend(self.all_day.iter().map(event_line));
        }

        for slot in &self.slots {
            if slot.events.is_empty() && !DAY_HOURS.contains(&slot.start_minute) {
                continue;
            }

            let events = slot
                .events
                .iter()
                .map(|e| paint(&e.event.text, e.event.color))
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!("{} │ {}", slot.label().dimmed(), events));
        }

        if !self.unscheduled.is_empty() {
            lines.push("No time".dimmed().to_string());
            lines.extend(self.unscheduled.iter().map(event_line));
        }

        lines.join("\n")
    }
}

impl Render for WeekTimeline {
    fn render(&self, style: &Style) -> String {
        let mut lines = Vec::new();

        for day in &self.days {
            let header = if day.date == style.today {
                accent(&day.header, style.theme)
            } else {
                day.header.bold().to_string()
            };
            lines.push(format!("{}  {}", header, hijri_label(day.date).dimmed()));

            if day.all_day.is_empty() && day.timed.is_empty() {
                lines.push("  -".dimmed().to_string());
            }
            lines.extend(day.all_day.iter().map(event_line));

            for chip in &day.timed {
                lines.push(format!(
                    "{}  {}",
                    event_line(&chip.event),
                    paint(&strip(chip.top, chip.height, STRIP_WIDTH), chip.event.event.color)
                ));
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

fn mini_month_lines(month: &MiniMonth, style: &Style) -> Vec<String> {
    let width = YEAR_WEEKDAY_HEADER.len() * 3 - 1;
    let mut lines = vec![
        format!("{:^width$}", month.name, width = width).bold().to_string(),
        YEAR_WEEKDAY_HEADER
            .iter()
            .map(|d| format!("{:>2}", d))
            .collect::<Vec<_>>()
            .join(" ")
            .dimmed()
            .to_string(),
    ];

    for week in month.days.chunks(7) {
        let row = week
            .iter()
            .map(|day| {
                let number = format!("{:>2}", day.date.day());
                if day.muted {
                    "  ".to_string()
                } else if day.date == style.today {
                    accent(&number, style.theme)
                } else if day.has_events {
                    number.red().bold().to_string()
                } else {
                    number
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        lines.push(row);
    }

    // Six week rows so months line up side by side
    while lines.len() < 8 {
        lines.push(" ".repeat(width));
    }
    lines
}

impl Render for YearOverview {
    fn render(&self, style: &Style) -> String {
        let mut out = Vec::new();

        for row in self.months.chunks(3) {
            let blocks: Vec<Vec<String>> = row.iter().map(|m| mini_month_lines(m, style)).collect();
            let height = blocks.iter().map(Vec::len).max().unwrap_or(0);

            for i in 0..height {
                out.push(
                    blocks
                        .iter()
                        .map(|b| b.get(i).cloned().unwrap_or_default())
                        .collect::<Vec<_>>()
                        .join("    "),
                );
            }
            out.push(String::new());
        }

        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdef", 4), "abc…");
        assert_eq!(fit("", 2), "  ");
    }

    #[test]
    fn strip_covers_the_chip() {
        assert_eq!(strip(0.5, 1.0 / 24.0, 24), format!("{}█{}", "·".repeat(12), "·".repeat(11)));
        // A chip at the very end still gets one column
        assert_eq!(strip(1.0, 0.0, 4), "···█");
    }

    #[test]
    fn short_id_handles_short_ids() {
        assert_eq!(short_id("0123456789"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }
}
