//! Settings schema history and the forward migrations between versions.
//!
//! - v1: flat record; a single `show_constellations` toggle.
//! - v2: adds `time_format` and `units`; splits constellations into lines
//!   and labels.
//! - v3: nested locale/display/location groups; adds deep-sky toggle,
//!   night mode and elevation.
//!
//! Each step is a pure function from one typed schema to the next.
//! [`migrate`] folds the ordered [`MIGRATIONS`] list over a stored value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::update::{clamp_latitude, clamp_magnitude_limit, normalize_longitude};
use super::{
    AppSettings, DisplaySettings, LocaleSettings, ObserverLocation, TimeFormat, Units,
};
use crate::error::{StoreError, StoreResult};
use crate::persistence::decode_payload;

pub const CURRENT_VERSION: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsV1 {
    pub language: String,
    pub show_constellations: bool,
    pub show_grid: bool,
    pub magnitude_limit: f64,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsV2 {
    pub language: String,
    pub time_format: TimeFormat,
    pub units: Units,
    pub show_constellation_lines: bool,
    pub show_constellation_labels: bool,
    pub show_grid: bool,
    pub magnitude_limit: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// A settings record at any known schema version.
#[derive(Debug, Clone, PartialEq)]
pub enum VersionedSettings {
    V1(SettingsV1),
    V2(SettingsV2),
    V3(AppSettings),
}

impl VersionedSettings {
    /// Decode `payload` as the schema for `version`.
    pub fn decode(version: u32, payload: Value) -> StoreResult<Self> {
        match version {
            1 => Ok(VersionedSettings::V1(decode_payload(payload)?)),
            2 => Ok(VersionedSettings::V2(decode_payload(payload)?)),
            3 => Ok(VersionedSettings::V3(decode_payload(payload)?)),
            other => Err(StoreError::UnsupportedVersion {
                key: "settings".to_string(),
                found: other,
                latest: CURRENT_VERSION,
            }),
        }
    }

    pub fn version(&self) -> u32 {
        match self {
            VersionedSettings::V1(_) => 1,
            VersionedSettings::V2(_) => 2,
            VersionedSettings::V3(_) => 3,
        }
    }
}

pub fn v1_to_v2(v1: SettingsV1) -> SettingsV2 {
    SettingsV2 {
        language: v1.language,
        time_format: TimeFormat::H24,
        units: Units::Metric,
        show_constellation_lines: v1.show_constellations,
        show_constellation_labels: v1.show_constellations,
        show_grid: v1.show_grid,
        magnitude_limit: v1.magnitude_limit,
        latitude: v1.latitude,
        longitude: v1.longitude,
    }
}

pub fn v2_to_v3(v2: SettingsV2) -> AppSettings {
    let defaults = DisplaySettings::default();
    AppSettings {
        locale: LocaleSettings {
            language: v2.language,
            time_format: v2.time_format,
            units: v2.units,
        },
        display: DisplaySettings {
            show_constellation_lines: v2.show_constellation_lines,
            show_constellation_labels: v2.show_constellation_labels,
            show_grid: v2.show_grid,
            star_magnitude_limit: clamp_magnitude_limit(v2.magnitude_limit)
                .unwrap_or(defaults.star_magnitude_limit),
            ..defaults
        },
        location: ObserverLocation {
            latitude: clamp_latitude(v2.latitude).unwrap_or(0.0),
            longitude: normalize_longitude(v2.longitude).unwrap_or(0.0),
            elevation: 0.0,
        },
    }
}

/// One step in the chain, applicable to records at `from`.
pub struct Migration {
    pub from: u32,
    pub apply: fn(VersionedSettings) -> VersionedSettings,
}

fn step_v1(settings: VersionedSettings) -> VersionedSettings {
    match settings {
        VersionedSettings::V1(v1) => VersionedSettings::V2(v1_to_v2(v1)),
        other => other,
    }
}

fn step_v2(settings: VersionedSettings) -> VersionedSettings {
    match settings {
        VersionedSettings::V2(v2) => VersionedSettings::V3(v2_to_v3(v2)),
        other => other,
    }
}

/// Ordered by `from`; the last entry produces the current version.
pub const MIGRATIONS: &[Migration] = &[
    Migration { from: 1, apply: step_v1 },
    Migration { from: 2, apply: step_v2 },
];

/// Bring a stored record up to the current schema.
pub fn migrate(stored: VersionedSettings) -> AppSettings {
    let start = stored.version();
    let migrated = MIGRATIONS
        .iter()
        .filter(|m| m.from >= start)
        .fold(stored, |acc, m| {
            log::debug!("Applying settings migration v{} -> v{}", m.from, m.from + 1);
            (m.apply)(acc)
        });

    match migrated {
        VersionedSettings::V3(settings) => settings,
        // Unreachable while MIGRATIONS covers every version below CURRENT_VERSION.
        VersionedSettings::V1(v1) => v2_to_v3(v1_to_v2(v1)),
        VersionedSettings::V2(v2) => v2_to_v3(v2),
    }
}
