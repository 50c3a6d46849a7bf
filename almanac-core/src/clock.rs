//! Wall clock in a fixed timezone.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{AlmanacError, AlmanacResult};

pub const DEFAULT_CLOCK_TIMEZONE: &str = "Asia/Jakarta";
pub const DEFAULT_CLOCK_LABEL: &str = "WIB";

pub fn parse_timezone(name: &str) -> AlmanacResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| AlmanacError::Config(format!("Unknown timezone '{}'", name)))
}

/// `now` rendered as "HH:MM:SS LABEL" in `tz`.
pub fn clock_string(now: DateTime<Utc>, tz: Tz, label: &str) -> String {
    let local = tz.from_utc_datetime(&now.naive_utc());
    let time = local.format("%H:%M:%S").to_string();

    if label.is_empty() {
        time
    } else {
        format!("{} {}", time, label)
    }
}
