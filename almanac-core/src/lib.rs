//! Core of the almanac calendar.
//!
//! This crate holds everything that is not terminal output:
//! - `store` and `storage` for the persisted event blob
//! - `recurrence` and `view` for what each day shows
//! - `state` for navigation and the event form
//! - `holidays`, `settings` and `clock` for the extras around the grid

pub mod clock;
pub mod config;
pub mod date;
pub mod error;
pub mod event;
pub mod hijri;
pub mod holidays;
pub mod recurrence;
pub mod reschedule;
pub mod settings;
pub mod state;
pub mod storage;
pub mod store;
pub mod view;

pub use error::{AlmanacError, AlmanacResult};
pub use event::*;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use store::{EventMap, EventStore, UpdateOutcome};
