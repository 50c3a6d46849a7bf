//! Event store: CRUD over the single persisted event blob.
//!
//! The blob maps ISO date keys to the events filed under that date, in
//! insertion order. Every mutation reads the whole blob, changes it and writes
//! it back. A key whose sequence becomes empty is removed, so a present key
//! always has at least one event.

use std::collections::BTreeMap;

use crate::date::{iso_key, parse_iso_key};
use crate::error::{AlmanacError, AlmanacResult};
use crate::event::{Event, EventOptions, EventPatch};
use crate::storage::Storage;

/// Storage key of the event blob.
pub const EVENTS_KEY: &str = "simple_calendar_events_v1";

/// ISO date key -> events filed under that date.
pub type EventMap = BTreeMap<String, Vec<Event>>;

/// What an [`EventStore::update`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// Fields were merged in place; carries the merged record.
    Edited(Event),
    /// The record moved to another date; carries the record as it was before the move.
    Moved { previous: Event, to: String },
}

pub struct EventStore<S: Storage> {
    storage: S,
}

impl<S: Storage> EventStore<S> {
    pub fn new(storage: S) -> Self {
        EventStore { storage }
    }

    /// Load the whole blob.
    ///
    /// An absent or unreadable blob is an empty store. A key holding something
    /// other than a list of events is dropped on its own.
    pub fn load_all(&self) -> EventMap {
        let raw = match self.storage.get(EVENTS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return EventMap::new(),
            Err(e) => {
                log::warn!("Could not read event store, starting empty: {}", e);
                return EventMap::new();
            }
        };

        let parsed: serde_json::Map<String, serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!("Event store is not a JSON object, starting empty: {}", e);
                return EventMap::new();
            }
        };

        let mut map = EventMap::new();
        for (key, value) in parsed {
            let mut events: Vec<Event> = match serde_json::from_value(value) {
                Ok(events) => events,
                Err(e) => {
                    log::warn!("Dropping unreadable events under '{}': {}", key, e);
                    continue;
                }
            };

            if events.is_empty() {
                continue;
            }
            for event in &mut events {
                if event.origin.is_empty() {
                    event.origin = key.clone();
                }
            }
            map.insert(key, events);
        }

        map
    }

    /// Replace the whole blob.
    pub fn save_all(&mut self, all: &EventMap) -> AlmanacResult<()> {
        let raw = serde_json::to_string(all)?;
        self.storage.set(EVENTS_KEY, &raw)
    }

    /// Events filed directly under `date_key` (no recurrence projections).
    pub fn events_for_date(&self, date_key: &str) -> Vec<Event> {
        self.load_all().remove(date_key).unwrap_or_default()
    }

    /// Append a new event under `date_key` and return that day's sequence.
    pub fn add(
        &mut self,
        date_key: &str,
        text: &str,
        options: EventOptions,
    ) -> AlmanacResult<Vec<Event>> {
        let date_key = iso_key(parse_iso_key(date_key)?);
        let text = text.trim();

        if text.is_empty() {
            return Err(AlmanacError::EmptyText);
        }
        if !options.is_all_day && options.end_time.is_some() && options.start_time.is_none() {
            return Err(AlmanacError::InvalidTimeRange);
        }

        let event = Event::new(&date_key, text, options);
        log::debug!("Adding event {} on {}", event.id, date_key);

        let mut all = self.load_all();
        let events = all.entry(date_key).or_default();
        events.push(event);
        let updated = events.clone();

        self.save_all(&all)?;
        Ok(updated)
    }

    /// Remove `id` from `date_key` and return the remaining sequence.
    ///
    /// An unknown id leaves the store untouched.
    pub fn remove(&mut self, date_key: &str, id: &str) -> AlmanacResult<Vec<Event>> {
        self.remove_checked(date_key, id)?;
        Ok(self.events_for_date(date_key))
    }

    /// Remove `id` from `date_key`, returning the removed record or `None`.
    pub fn remove_checked(&mut self, date_key: &str, id: &str) -> AlmanacResult<Option<Event>> {
        let mut all = self.load_all();

        let Some(events) = all.get_mut(date_key) else {
            return Ok(None);
        };
        let Some(index) = events.iter().position(|e| e.id == id) else {
            return Ok(None);
        };

        let removed = events.remove(index);
        if events.is_empty() {
            all.remove(date_key);
        }

        self.save_all(&all)?;
        Ok(Some(removed))
    }

    /// Apply `patch` to the event `id` filed under `origin_key`.
    ///
    /// Returns `None` (and writes nothing) when there is no such event. A merge
    /// that leaves an end time without a start is refused and nothing is written.
    pub fn update(
        &mut self,
        origin_key: &str,
        id: &str,
        patch: &EventPatch,
    ) -> AlmanacResult<Option<UpdateOutcome>> {
        if patch.text.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(AlmanacError::EmptyText);
        }

        let mut all = self.load_all();

        let Some(events) = all.get_mut(origin_key) else {
            return Ok(None);
        };
        let Some(index) = events.iter().position(|e| e.id == id) else {
            return Ok(None);
        };

        let new_key = patch
            .new_date
            .map(iso_key)
            .filter(|key| key != origin_key);

        let outcome = match new_key {
            Some(new_key) => {
                let previous = events.remove(index);
                if events.is_empty() {
                    all.remove(origin_key);
                }

                let mut moved = previous.clone();
                moved.apply(patch);
                check_time_range(&moved)?;
                moved.origin = new_key.clone();
                log::debug!("Moving event {} from {} to {}", id, origin_key, new_key);
                all.entry(new_key.clone()).or_default().push(moved);

                UpdateOutcome::Moved {
                    previous,
                    to: new_key,
                }
            }
            None => {
                let record = &mut events[index];
                record.apply(patch);
                check_time_range(record)?;
                UpdateOutcome::Edited(record.clone())
            }
        };

        self.save_all(&all)?;
        Ok(Some(outcome))
    }

    /// Find an event anywhere in the store by exact id.
    pub fn find(&self, id: &str) -> Option<(String, Event)> {
        self.load_all().into_iter().find_map(|(key, events)| {
            events
                .into_iter()
                .find(|e| e.id == id)
                .map(|event| (key, event))
        })
    }

    /// Find an event by exact id or by a unique id prefix.
    pub fn find_by_prefix(&self, prefix: &str) -> AlmanacResult<(String, Event)> {
        if let Some(found) = self.find(prefix) {
            return Ok(found);
        }

        let mut matches: Vec<(String, Event)> = self
            .load_all()
            .into_iter()
            .flat_map(|(key, events)| events.into_iter().map(move |e| (key.clone(), e)))
            .filter(|(_, e)| !prefix.is_empty() && e.id.starts_with(prefix))
            .collect();

        match matches.len() {
            0 => Err(AlmanacError::EventNotFound(prefix.to_string())),
            1 => Ok(matches.remove(0)),
            _ => Err(AlmanacError::AmbiguousId(prefix.to_string())),
        }
    }
}

fn check_time_range(event: &Event) -> AlmanacResult<()> {
    if event.end_time.is_some() && event.start_time.is_none() {
        return Err(AlmanacError::InvalidTimeRange);
    }
    Ok(())
}
