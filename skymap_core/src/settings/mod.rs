//! Application settings: the typed record, its update commands and the
//! migrations that bring old persisted versions up to date.

pub mod migrations;
pub mod update;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreResult;
use crate::persistence::Persisted;

pub use migrations::{migrate, SettingsV1, SettingsV2, VersionedSettings, CURRENT_VERSION};
pub use update::SettingUpdate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFormat {
    #[default]
    H24,
    H12,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocaleSettings {
    pub language: String,
    pub time_format: TimeFormat,
    pub units: Units,
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            time_format: TimeFormat::default(),
            units: Units::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub show_constellation_lines: bool,
    pub show_constellation_labels: bool,
    pub show_grid: bool,
    pub show_deep_sky: bool,
    pub star_magnitude_limit: f64,
    pub night_mode: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_constellation_lines: true,
            show_constellation_labels: true,
            show_grid: false,
            show_deep_sky: true,
            star_magnitude_limit: 6.5,
            night_mode: false,
        }
    }
}

/// Observer position. Degrees, with east-positive longitude; elevation in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ObserverLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

/// All user-facing settings (schema version 3).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub locale: LocaleSettings,
    pub display: DisplaySettings,
    pub location: ObserverLocation,
}

impl Persisted for AppSettings {
    const KEY: &'static str = "settings";
    const VERSION: u32 = CURRENT_VERSION;

    fn to_payload(&self) -> StoreResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn from_payload(version: u32, payload: Value) -> StoreResult<Self> {
        let stored = VersionedSettings::decode(version, payload)?;
        Ok(migrate(stored))
    }
}

/// Settings state container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsStore {
    settings: AppSettings,
}

impl SettingsStore {
    pub fn new(settings: AppSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Apply one typed update.
    pub fn apply(&mut self, update: SettingUpdate) {
        update.apply_to(&mut self.settings);
    }

    /// Apply several updates in order.
    pub fn apply_all<I>(&mut self, updates: I)
    where
        I: IntoIterator<Item = SettingUpdate>,
    {
        for update in updates {
            self.apply(update);
        }
    }

    pub fn reset_to_defaults(&mut self) {
        self.settings = AppSettings::default();
    }
}
