//! User preferences kept next to the event blob.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AlmanacResult;
use crate::storage::Storage;

pub const THEME_KEY: &str = "calendar_theme";
pub const SYNCED_YEARS_KEY: &str = "calendar_synced_years";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// "Light Mode" / "Dark Mode"
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light Mode",
            Theme::Dark => "Dark Mode",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(format!("Unknown theme '{}'. Expected light or dark", s)),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Theme preference and holiday bookkeeping on top of a storage port.
pub struct Settings<S: Storage> {
    storage: S,
}

impl<S: Storage> Settings<S> {
    pub fn new(storage: S) -> Self {
        Settings { storage }
    }

    /// Saved theme, dark when unset or unreadable.
    pub fn theme(&self) -> Theme {
        match self.storage.get(THEME_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_default(),
            Ok(None) => Theme::default(),
            Err(e) => {
                log::warn!("Could not read theme: {}", e);
                Theme::default()
            }
        }
    }

    pub fn set_theme(&mut self, theme: Theme) -> AlmanacResult<()> {
        self.storage.set(THEME_KEY, theme.as_str())
    }

    /// Flip between light and dark and return the new theme.
    pub fn toggle_theme(&mut self) -> AlmanacResult<Theme> {
        let theme = self.theme().toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }

    /// Years whose holidays were already merged into the store.
    pub fn synced_years(&self) -> BTreeSet<i32> {
        let raw = match self.storage.get(SYNCED_YEARS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeSet::new(),
            Err(e) => {
                log::warn!("Could not read synced years: {}", e);
                return BTreeSet::new();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable synced years: {}", e);
            BTreeSet::new()
        })
    }

    pub fn is_synced(&self, year: i32) -> bool {
        self.synced_years().contains(&year)
    }

    pub fn mark_synced(&mut self, year: i32) -> AlmanacResult<()> {
        let mut years = self.synced_years();
        years.insert(year);
        let raw = serde_json::to_string(&years)?;
        self.storage.set(SYNCED_YEARS_KEY, &raw)
    }
}
