//! Everything a command needs: configuration, storage and today's date.

use std::path::PathBuf;

use almanac_core::config::AlmanacConfig;
use almanac_core::settings::Settings;
use almanac_core::state::{Action, AppState};
use almanac_core::{EventStore, FileStorage};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

pub struct App {
    pub config: AlmanacConfig,
    pub storage: FileStorage,
    pub today: NaiveDate,
}

impl App {
    pub fn load(data_dir: Option<PathBuf>) -> Result<Self> {
        let config = AlmanacConfig::load().context("Could not load configuration")?;
        let dir = data_dir.unwrap_or_else(|| config.data_path());
        log::debug!("Using data directory {}", dir.display());

        Ok(App::new(config, dir, Local::now().date_naive()))
    }

    pub fn new(config: AlmanacConfig, dir: PathBuf, today: NaiveDate) -> Self {
        App {
            config,
            storage: FileStorage::new(dir),
            today,
        }
    }

    pub fn store(&self) -> EventStore<FileStorage> {
        EventStore::new(self.storage.clone())
    }

    pub fn settings(&self) -> Settings<FileStorage> {
        Settings::new(self.storage.clone())
    }

    pub fn state(&self) -> AppState {
        AppState::load(&self.storage, self.today)
    }

    /// Apply `action` to the saved state and persist the result.
    pub fn dispatch(&self, action: Action) -> Result<AppState> {
        let state = self.state().apply(action);
        self.save_state(&state)?;
        Ok(state)
    }

    pub fn save_state(&self, state: &AppState) -> Result<()> {
        let mut storage = self.storage.clone();
        state.save(&mut storage).context("Could not save view state")
    }
}
