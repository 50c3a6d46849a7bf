//! Gregorian to Hijri conversion for the date overlay.
//!
//! Uses the Umm al-Qura calendar, the official civil calendar of Saudi Arabia,
//! through `icu_calendar`.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use icu_calendar::Date;
use icu_calendar::cal::HijriUmmAlQura;

use crate::error::{AlmanacError, AlmanacResult};

pub const HIJRI_MONTH_NAMES: [&str; 12] = [
    "Muharram",
    "Safar",
    "Rabi' al-awwal",
    "Rabi' al-thani",
    "Jumada al-awwal",
    "Jumada al-thani",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

/// Julian day number of 1 Muharram 1 AH.
const HIJRI_EPOCH_JDN: i64 = 1_948_440;

/// `num_days_from_ce` of 0001-01-01 is 1, its Julian day number is 1721426.
const CE_TO_JDN: i64 = 1_721_425;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HijriDate {
    pub year: i64,
    /// 1-based
    pub month: u32,
    pub day: u32,
}

impl HijriDate {
    pub fn month_name(&self) -> &'static str {
        HIJRI_MONTH_NAMES
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("")
    }
}

impl fmt::Display for HijriDate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02} {} {}", self.day, self.month_name(), self.year)
    }
}

pub fn gregorian_to_hijri(date: NaiveDate) -> AlmanacResult<HijriDate> {
    let failed = || AlmanacError::HijriConversion(date.to_string());

    if i64::from(date.num_days_from_ce()) + CE_TO_JDN < HIJRI_EPOCH_JDN {
        return Err(failed());
    }

    let iso = Date::try_new_iso(date.year(), date.month() as u8, date.day() as u8)
        .map_err(|_| failed())?;
    let hijri = iso.to_calendar(HijriUmmAlQura::new());

    let month = u32::from(hijri.month().ordinal);
    let day = u32::from(hijri.day_of_month().0);
    if !(1..=12).contains(&month) || !(1..=30).contains(&day) {
        return Err(failed());
    }

    Ok(HijriDate {
        year: i64::from(hijri.year().era_year_or_related_iso()),
        month,
        day,
    })
}

/// "DD MonthName YYYY"
pub fn format_hijri(hijri: &HijriDate) -> String {
    hijri.to_string()
}

/// Hijri label for a date, or an empty string when the date cannot be converted.
pub fn hijri_label(date: NaiveDate) -> String {
    match gregorian_to_hijri(date) {
        Ok(hijri) => format_hijri(&hijri),
        Err(e) => {
            log::debug!("{}", e);
            String::new()
        }
    }
}
