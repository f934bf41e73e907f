//! Typed setting updates.
//!
//! One variant per editable field. Numeric values are clamped into range;
//! non-finite numbers leave the setting unchanged.

use serde::{Deserialize, Serialize};

use super::{AppSettings, ObserverLocation, TimeFormat, Units};

pub const MIN_MAGNITUDE_LIMIT: f64 = -1.0;
pub const MAX_MAGNITUDE_LIMIT: f64 = 12.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "setting", content = "value", rename_all = "snake_case")]
pub enum SettingUpdate {
    Language(String),
    TimeFormat(TimeFormat),
    Units(Units),
    ShowConstellationLines(bool),
    ShowConstellationLabels(bool),
    ShowGrid(bool),
    ShowDeepSky(bool),
    StarMagnitudeLimit(f64),
    NightMode(bool),
    Latitude(f64),
    Longitude(f64),
    Elevation(f64),
    Location(ObserverLocation),
}

impl SettingUpdate {
    pub(crate) fn apply_to(self, settings: &mut AppSettings) {
        let display = &mut settings.display;
        let location = &mut settings.location;

        match self {
            SettingUpdate::Language(language) => {
                let trimmed = language.trim();
                if !trimmed.is_empty() {
                    settings.locale.language = trimmed.to_string();
                }
            }
            SettingUpdate::TimeFormat(format) => settings.locale.time_format = format,
            SettingUpdate::Units(units) => settings.locale.units = units,
            SettingUpdate::ShowConstellationLines(on) => display.show_constellation_lines = on,
            SettingUpdate::ShowConstellationLabels(on) => display.show_constellation_labels = on,
            SettingUpdate::ShowGrid(on) => display.show_grid = on,
            SettingUpdate::ShowDeepSky(on) => display.show_deep_sky = on,
            SettingUpdate::StarMagnitudeLimit(mag) => {
                if let Some(mag) = clamp_magnitude_limit(mag) {
                    display.star_magnitude_limit = mag;
                }
            }
            SettingUpdate::NightMode(on) => display.night_mode = on,
            SettingUpdate::Latitude(lat) => {
                if let Some(lat) = clamp_latitude(lat) {
                    location.latitude = lat;
                }
            }
            SettingUpdate::Longitude(lon) => {
                if let Some(lon) = normalize_longitude(lon) {
                    location.longitude = lon;
                }
            }
            SettingUpdate::Elevation(elevation) => {
                if elevation.is_finite() {
                    location.elevation = elevation;
                }
            }
            SettingUpdate::Location(new) => {
                if let (Some(lat), Some(lon), true) = (
                    clamp_latitude(new.latitude),
                    normalize_longitude(new.longitude),
                    new.elevation.is_finite(),
                ) {
                    *location = ObserverLocation {
                        latitude: lat,
                        longitude: lon,
                        elevation: new.elevation,
                    };
                }
            }
        }
    }
}

pub(crate) fn clamp_magnitude_limit(mag: f64) -> Option<f64> {
    mag.is_finite().then(|| mag.clamp(MIN_MAGNITUDE_LIMIT, MAX_MAGNITUDE_LIMIT))
}

pub(crate) fn clamp_latitude(lat: f64) -> Option<f64> {
    lat.is_finite().then(|| lat.clamp(-90.0, 90.0))
}

/// Wrap into `(-180, 180]`.
pub(crate) fn normalize_longitude(lon: f64) -> Option<f64> {
    if !lon.is_finite() {
        return None;
    }
    let wrapped = lon.rem_euclid(360.0);
    Some(if wrapped > 180.0 { wrapped - 360.0 } else { wrapped })
}
