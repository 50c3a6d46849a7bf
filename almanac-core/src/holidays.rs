//! Public holiday import and cleanup.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::iso_key;
use crate::error::{AlmanacError, AlmanacResult};
use crate::event::{Event, EventColor, EventOptions, Repeat};
use crate::settings::Settings;
use crate::storage::Storage;
use crate::store::EventStore;

pub const DEFAULT_HOLIDAY_API: &str = "https://date.nager.at/api/v3";
pub const DEFAULT_HOLIDAY_COUNTRY: &str = "ID";

/// One entry of a holiday feed. Extra fields in the payload are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
}

/// Anything that can list the public holidays of a year.
#[async_trait]
pub trait HolidaySource {
    async fn fetch(&self, year: i32) -> AlmanacResult<Vec<Holiday>>;
}

/// Client for the Nager.Date public holiday API.
pub struct NagerClient {
    http: reqwest::Client,
    base_url: String,
    country: String,
}

impl NagerClient {
    pub fn new(base_url: &str, country: &str) -> AlmanacResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(format!("almanac/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AlmanacError::HolidaySync(e.to_string()))?;

        Ok(NagerClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            country: country.to_uppercase(),
        })
    }

    pub fn url_for(&self, year: i32) -> String {
        format!("{}/PublicHolidays/{}/{}", self.base_url, year, self.country)
    }
}

#[async_trait]
impl HolidaySource for NagerClient {
    async fn fetch(&self, year: i32) -> AlmanacResult<Vec<Holiday>> {
        let url = self.url_for(year);
        log::debug!("Fetching holidays from {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AlmanacError::HolidaySync(format!("Could not reach {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(AlmanacError::HolidaySync(format!(
                "{} returned HTTP {}",
                url,
                response.status()
            )));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AlmanacError::HolidaySync(e.to_string()))?;

        Ok(serde_json::from_slice(&body)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub year: i32,
    pub added: usize,
    pub skipped: usize,
    /// The year was synced before and nothing was fetched.
    pub already_synced: bool,
}

/// Merge the holidays of `year` into `store` as red all-day events.
///
/// A year that was already synced is left alone unless `force` is set. An
/// empty feed is an error and changes nothing.
pub async fn sync_holidays<S, T, H>(
    store: &mut EventStore<S>,
    settings: &mut Settings<T>,
    source: &H,
    year: i32,
    force: bool,
) -> AlmanacResult<SyncReport>
where
    S: Storage,
    T: Storage,
    H: HolidaySource + ?Sized,
{
    if !force && settings.is_synced(year) {
        log::info!("Holidays for {} already synced", year);
        return Ok(SyncReport {
            year,
            already_synced: true,
            ..Default::default()
        });
    }

    let holidays = source.fetch(year).await?;
    if holidays.is_empty() {
        return Err(AlmanacError::HolidaySync(format!("No holidays returned for {year}")));
    }

    let mut report = SyncReport {
        year,
        ..Default::default()
    };
    let mut all = store.load_all();

    for holiday in holidays {
        let key = iso_key(holiday.date);
        let events = all.entry(key.clone()).or_default();

        if events.iter().any(|e| e.text == holiday.name && e.is_all_day) {
            report.skipped += 1;
            continue;
        }

        events.push(Event::new(&key, &holiday.name, EventOptions {
            is_all_day: true,
            color: EventColor::Red,
            repeat: Repeat::None,
            ..Default::default()
        }));
        report.added += 1;
    }

    store.save_all(&all)?;
    settings.mark_synced(year)?;

    log::info!(
        "Synced {} holidays for {} ({} already present)",
        report.added,
        year,
        report.skipped
    );
    Ok(report)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub duplicates_removed: usize,
    pub recolored: usize,
}

impl CleanupReport {
    pub fn changed(&self) -> bool {
        self.duplicates_removed > 0 || self.recolored > 0
    }
}

/// Text like "1 Muharram" or "Hari Raya 2" is treated as a holiday.
pub fn looks_like_holiday(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit()) && text.chars().any(char::is_whitespace)
}

/// Drop repeated holidays on each date and paint the survivors red.
///
/// User events are never touched.
pub fn finalize_holidays<S: Storage>(store: &mut EventStore<S>) -> AlmanacResult<CleanupReport> {
    let mut all = store.load_all();
    let mut report = CleanupReport::default();

    for events in all.values_mut() {
        let mut seen = HashSet::new();

        events.retain_mut(|event| {
            if !looks_like_holiday(&event.text) {
                return true;
            }
            if !seen.insert(event.text.clone()) {
                report.duplicates_removed += 1;
                return false;
            }
            if event.color != EventColor::Red {
                event.color = EventColor::Red;
                report.recolored += 1;
            }
            true
        });
    }

    store.save_all(&all)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeSource {
        holidays: Vec<Holiday>,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(holidays: Vec<Holiday>) -> Self {
            FakeSource {
                holidays,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl HolidaySource for FakeSource {
        async fn fetch(&self, _year: i32) -> AlmanacResult<Vec<Holiday>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.holidays.clone())
        }
    }

    fn holiday(date: &str, name: &str) -> Holiday {
        Holiday {
            date: date.parse().unwrap(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn sync_adds_red_all_day_events_and_marks_the_year() {
        let mut store = EventStore::new(MemoryStorage::new());
        let mut settings = Settings::new(MemoryStorage::new());
        let source = FakeSource::new(vec![
            holiday("2024-01-01", "Tahun Baru Masehi"),
            holiday("2024-08-17", "Hari Kemerdekaan"),
        ]);

        let report = sync_holidays(&mut store, &mut settings, &source, 2024, false)
            .await
            .unwrap();

        assert_eq!(report.added, 2);
        assert_eq!(report.skipped, 0);
        assert!(settings.is_synced(2024));

        let day = store.events_for_date("2024-08-17");
        assert_eq!(day.len(), 1);
        assert!(day[0].is_all_day);
        assert_eq!(day[0].color, EventColor::Red);
        assert_eq!(day[0].repeat, Repeat::None);
    }

    #[tokio::test]
    async fn synced_year_is_refused_unless_forced() {
        let mut store = EventStore::new(MemoryStorage::new());
        let mut settings = Settings::new(MemoryStorage::new());
        let source = FakeSource::new(vec![holiday("2024-01-01", "Tahun Baru Masehi")]);

        sync_holidays(&mut store, &mut settings, &source, 2024, false).await.unwrap();
        let again = sync_holidays(&mut store, &mut settings, &source, 2024, false).await.unwrap();
        assert!(again.already_synced);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        let forced = sync_holidays(&mut store, &mut settings, &source, 2024, true).await.unwrap();
        assert_eq!(forced.added, 0);
        assert_eq!(forced.skipped, 1);
        assert_eq!(store.events_for_date("2024-01-01").len(), 1);
    }

    #[tokio::test]
    async fn existing_timed_event_with_same_text_does_not_block_import() {
        let mut store = EventStore::new(MemoryStorage::new());
        let mut settings = Settings::new(MemoryStorage::new());
        store
            .add("2024-01-01", "Tahun Baru Masehi", EventOptions {
                start_time: Some("10:00".parse().unwrap()),
                ..Default::default()
            })
            .unwrap();
        let source = FakeSource::new(vec![holiday("2024-01-01", "Tahun Baru Masehi")]);

        let report = sync_holidays(&mut store, &mut settings, &source, 2024, false).await.unwrap();
        assert_eq!(report.added, 1);
        assert_eq!(store.events_for_date("2024-01-01").len(), 2);
    }

    #[tokio::test]
    async fn empty_feed_is_an_error_and_changes_nothing() {
        let mut store = EventStore::new(MemoryStorage::new());
        let mut settings = Settings::new(MemoryStorage::new());
        let source = FakeSource::new(Vec::new());

        let result = sync_holidays(&mut store, &mut settings, &source, 2024, false).await;
        assert!(matches!(result, Err(AlmanacError::HolidaySync(_))));
        assert!(!settings.is_synced(2024));
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn payload_with_extra_fields_parses() {
        let raw = r#"[{"date":"2024-08-17","localName":"Hari Ulang Tahun Kemerdekaan","name":"Independence Day","countryCode":"ID","global":true}]"#;
        let parsed: Vec<Holiday> = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed, vec![holiday("2024-08-17", "Independence Day")]);
    }

    #[test]
    fn nager_url() {
        let client = NagerClient::new("https://date.nager.at/api/v3/", "id").unwrap();
        assert_eq!(client.url_for(2025), "https://date.nager.at/api/v3/PublicHolidays/2025/ID");
    }

    #[test]
    fn cleanup_dedupes_holidays_and_recolors() {
        let mut store = EventStore::new(MemoryStorage::new());
        let blue = EventOptions {
            is_all_day: true,
            color: EventColor::Blue,
            ..Default::default()
        };
        store.add("2024-07-07", "1 Muharram", blue.clone()).unwrap();
        store.add("2024-07-07", "1 Muharram", blue.clone()).unwrap();
        store.add("2024-07-07", "Lunch", blue.clone()).unwrap();
        store.add("2024-07-07", "Lunch", blue).unwrap();

        let report = finalize_holidays(&mut store).unwrap();
        assert_eq!(report, CleanupReport {
            duplicates_removed: 1,
            recolored: 1
        });
        assert!(report.changed());

        let day = store.events_for_date("2024-07-07");
        assert_eq!(day.len(), 3);
        assert_eq!(day[0].color, EventColor::Red);
        assert_eq!(day[1].color, EventColor::Blue);
    }

    #[test]
    fn cleanup_on_clean_store_reports_nothing() {
        let mut store = EventStore::new(MemoryStorage::new());
        store.add("2024-07-07", "Standup", EventOptions::default()).unwrap();
        assert!(!finalize_holidays(&mut store).unwrap().changed());
    }

    #[test]
    fn holiday_heuristic() {
        assert!(looks_like_holiday("1 Muharram"));
        assert!(!looks_like_holiday("Muharram"));
        assert!(!looks_like_holiday("Q3"));
    }
}
