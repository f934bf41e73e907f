//! Built-in camera and telescope presets.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// A named camera: sensor size in mm and pixel pitch in µm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraPreset {
    pub id: String,
    pub name: String,
    pub sensor_width: f64,
    pub sensor_height: f64,
    pub pixel_size: f64,
}

/// A named optical tube: focal length and aperture in mm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelescopePreset {
    pub id: String,
    pub name: String,
    pub focal_length: f64,
    pub aperture: f64,
    pub telescope_type: TelescopeType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelescopeType {
    Refractor,
    Reflector,
    Catadioptric,
    Lens,
}

impl CameraPreset {
    pub fn new(id: &str, name: &str, sensor_width: f64, sensor_height: f64, pixel_size: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            sensor_width,
            sensor_height,
            pixel_size,
        }
    }
}

impl TelescopePreset {
    pub fn new(
        id: &str,
        name: &str,
        focal_length: f64,
        aperture: f64,
        telescope_type: TelescopeType,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            focal_length,
            aperture,
            telescope_type,
        }
    }
}

static CAMERA_PRESETS: Lazy<Vec<CameraPreset>> = Lazy::new(|| {
    vec![
        CameraPreset::new("asi2600mc", "ZWO ASI2600MC Pro", 23.5, 15.7, 3.76),
        CameraPreset::new("asi294mc", "ZWO ASI294MC Pro", 19.1, 13.0, 4.63),
        CameraPreset::new("asi533mc", "ZWO ASI533MC Pro", 11.31, 11.31, 3.76),
        CameraPreset::new("asi183mm", "ZWO ASI183MM Pro", 13.2, 8.8, 2.4),
        CameraPreset::new("asi120mm", "ZWO ASI120MM Mini", 4.8, 3.6, 3.75),
        CameraPreset::new("canon-eos-r", "Canon EOS R", 36.0, 24.0, 5.36),
        CameraPreset::new("nikon-d850", "Nikon D850", 35.9, 23.9, 4.35),
        CameraPreset::new("sony-a7iii", "Sony A7 III", 35.6, 23.8, 5.93),
    ]
});

static TELESCOPE_PRESETS: Lazy<Vec<TelescopePreset>> = Lazy::new(|| {
    use self::TelescopeType::*;
    vec![
        TelescopePreset::new("redcat51", "William Optics RedCat 51", 250.0, 51.0, Refractor),
        TelescopePreset::new("evostar72ed", "Sky-Watcher Evostar 72ED", 420.0, 72.0, Refractor),
        TelescopePreset::new("gt81", "William Optics GT81", 478.0, 81.0, Refractor),
        TelescopePreset::new("esprit100", "Sky-Watcher Esprit 100ED", 550.0, 100.0, Refractor),
        TelescopePreset::new("newton200", "Sky-Watcher 200P", 1000.0, 200.0, Reflector),
        TelescopePreset::new("c8", "Celestron C8", 2032.0, 203.0, Catadioptric),
        TelescopePreset::new("samyang135", "Samyang 135mm f/2", 135.0, 67.5, Lens),
    ]
});

/// Every built-in camera preset.
pub fn camera_presets() -> &'static [CameraPreset] {
    &CAMERA_PRESETS
}

/// Every built-in telescope preset.
pub fn telescope_presets() -> &'static [TelescopePreset] {
    &TELESCOPE_PRESETS
}

pub fn find_camera_preset(id: &str) -> Option<&'static CameraPreset> {
    CAMERA_PRESETS.iter().find(|p| p.id == id)
}

pub fn find_telescope_preset(id: &str) -> Option<&'static TelescopePreset> {
    TELESCOPE_PRESETS.iter().find(|p| p.id == id)
}
