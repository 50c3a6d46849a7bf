//! Parsing of event fields given on the command line.

use almanac_core::event::{EventColor, Repeat, TimeOfDay};
use anyhow::{Context, Result, anyhow};

pub fn parse_time(input: &str) -> Result<TimeOfDay> {
    Ok(input.parse::<TimeOfDay>()?)
}

pub fn parse_color(input: &str) -> Result<EventColor> {
    input.parse().map_err(|e: String| anyhow!(e))
}

pub fn parse_repeat(input: &str) -> Result<Repeat> {
    input.parse().map_err(|e: String| anyhow!(e))
}

/// End time `duration` after `start`, clamped to 23:59.
pub fn end_after(start: TimeOfDay, duration: &str) -> Result<TimeOfDay> {
    let dur = humantime::parse_duration(duration)
        .with_context(|| format!("Could not parse duration: \"{}\"", duration))?;
    let minutes = u16::try_from(dur.as_secs() / 60).unwrap_or(u16::MAX);

    Ok(TimeOfDay::from_minutes(start.minutes().saturating_add(minutes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_sets_end() {
        let start = parse_time("09:15").unwrap();
        assert_eq!(end_after(start, "45m").unwrap(), parse_time("10:00").unwrap());
        assert_eq!(end_after(start, "1h 30m").unwrap(), parse_time("10:45").unwrap());
    }

    #[test]
    fn duration_past_midnight_clamps() {
        let start = parse_time("22:00").unwrap();
        assert_eq!(end_after(start, "5hours").unwrap(), parse_time("23:59").unwrap());
    }

    #[test]
    fn bad_inputs_are_errors() {
        assert!(parse_time("25:00").is_err());
        assert!(parse_color("teal").is_err());
        assert!(parse_repeat("hourly").is_err());
        assert!(end_after(parse_time("09:00").unwrap(), "soon").is_err());
    }

    #[test]
    fn names_parse() {
        assert_eq!(parse_color("Purple").unwrap(), EventColor::Purple);
        assert_eq!(parse_repeat("weekly").unwrap(), Repeat::Weekly);
    }
}
