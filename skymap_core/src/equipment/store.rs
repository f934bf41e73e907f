//! Equipment store: current camera/telescope parameters, active presets
//! and mosaic settings.
//!
//! Derived quantities are recomputed on every call; nothing is cached.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::mosaic::{MosaicConfig, MosaicCoverage, MosaicLimits, OverlapUnit};
use super::optics::{self, FieldOfView, Resolution};
use super::presets::{CameraPreset, TelescopePreset};
use crate::error::StoreResult;
use crate::persistence::{decode_payload, Persisted};

/// Camera and telescope parameters.
///
/// Sensor dimensions, focal length and aperture in mm; pixel size in µm.
/// All five are expected to stay positive. The store does not enforce it;
/// callers clamp input first (see [`crate::SkyMapConfig::clamp_parameter`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquipmentParameters {
    pub sensor_width: f64,
    pub sensor_height: f64,
    pub pixel_size: f64,
    pub focal_length: f64,
    pub aperture: f64,
}

impl Default for EquipmentParameters {
    fn default() -> Self {
        Self {
            sensor_width: 23.5,
            sensor_height: 15.6,
            pixel_size: 3.76,
            focal_length: 400.0,
            aperture: 80.0,
        }
    }
}

/// Equipment state container.
///
/// # Examples
///
/// ```
/// use skymap_core::equipment::{find_camera_preset, EquipmentStore};
///
/// let mut store = EquipmentStore::default();
/// store.apply_camera_preset(find_camera_preset("asi2600mc").unwrap());
/// assert_eq!(store.active_camera_id(), Some("asi2600mc"));
///
/// store.set_sensor_width(20.0);
/// assert_eq!(store.active_camera_id(), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EquipmentStore {
    params: EquipmentParameters,
    active_camera_id: Option<String>,
    active_telescope_id: Option<String>,
    mosaic: MosaicConfig,
    limits: MosaicLimits,
}

impl Default for EquipmentStore {
    fn default() -> Self {
        Self::new(MosaicLimits::default())
    }
}

impl EquipmentStore {
    pub fn new(limits: MosaicLimits) -> Self {
        Self {
            params: EquipmentParameters::default(),
            active_camera_id: None,
            active_telescope_id: None,
            mosaic: MosaicConfig::default().clamped(&limits),
            limits,
        }
    }

    pub fn parameters(&self) -> &EquipmentParameters {
        &self.params
    }

    pub fn active_camera_id(&self) -> Option<&str> {
        self.active_camera_id.as_deref()
    }

    pub fn active_telescope_id(&self) -> Option<&str> {
        self.active_telescope_id.as_deref()
    }

    pub fn mosaic(&self) -> &MosaicConfig {
        &self.mosaic
    }

    pub fn limits(&self) -> &MosaicLimits {
        &self.limits
    }

    // Camera fields: a manual edit leaves preset mode.

    pub fn set_sensor_width(&mut self, value: f64) {
        self.params.sensor_width = value;
        self.active_camera_id = None;
    }

    pub fn set_sensor_height(&mut self, value: f64) {
        self.params.sensor_height = value;
        self.active_camera_id = None;
    }

    pub fn set_pixel_size(&mut self, value: f64) {
        self.params.pixel_size = value;
        self.active_camera_id = None;
    }

    // Telescope fields.

    pub fn set_focal_length(&mut self, value: f64) {
        self.params.focal_length = value;
        self.active_telescope_id = None;
    }

    pub fn set_aperture(&mut self, value: f64) {
        self.params.aperture = value;
        self.active_telescope_id = None;
    }

    /// Overwrite the camera fields and remember which preset they came from.
    pub fn apply_camera_preset(&mut self, preset: &CameraPreset) {
        log::debug!("Applying camera preset '{}'", preset.id);
        self.params.sensor_width = preset.sensor_width;
        self.params.sensor_height = preset.sensor_height;
        self.params.pixel_size = preset.pixel_size;
        self.active_camera_id = Some(preset.id.clone());
    }

    /// Overwrite the telescope fields and remember which preset they came from.
    pub fn apply_telescope_preset(&mut self, preset: &TelescopePreset) {
        log::debug!("Applying telescope preset '{}'", preset.id);
        self.params.focal_length = preset.focal_length;
        self.params.aperture = preset.aperture;
        self.active_telescope_id = Some(preset.id.clone());
    }

    /// Back to the default parameters with no preset and the default mosaic.
    pub fn reset_to_defaults(&mut self) {
        *self = Self::new(self.limits);
    }

    pub fn set_mosaic_enabled(&mut self, enabled: bool) {
        self.mosaic.set_enabled(enabled);
    }

    pub fn set_mosaic_rows(&mut self, rows: u32) {
        self.mosaic.set_rows(rows, &self.limits);
    }

    pub fn set_mosaic_cols(&mut self, cols: u32) {
        self.mosaic.set_cols(cols, &self.limits);
    }

    pub fn set_mosaic_overlap(&mut self, overlap: f64) {
        self.mosaic.set_overlap(overlap, &self.limits);
    }

    pub fn set_mosaic_overlap_unit(&mut self, unit: OverlapUnit) {
        self.mosaic.set_overlap_unit(unit, &self.limits);
    }

    pub fn field_of_view(&self) -> FieldOfView {
        FieldOfView::new(
            self.params.sensor_width,
            self.params.sensor_height,
            self.params.focal_length,
        )
    }

    pub fn field_of_view_width(&self) -> f64 {
        optics::field_of_view_deg(self.params.sensor_width, self.params.focal_length)
    }

    pub fn field_of_view_height(&self) -> f64 {
        optics::field_of_view_deg(self.params.sensor_height, self.params.focal_length)
    }

    /// Arcseconds per pixel.
    pub fn image_scale(&self) -> f64 {
        optics::image_scale_arcsec(self.params.pixel_size, self.params.focal_length)
    }

    /// `0.0` when the aperture is not positive.
    pub fn f_ratio(&self) -> f64 {
        optics::f_ratio(self.params.focal_length, self.params.aperture)
    }

    pub fn resolution(&self) -> Resolution {
        Resolution {
            width: optics::resolution_px(self.params.sensor_width, self.params.pixel_size),
            height: optics::resolution_px(self.params.sensor_height, self.params.pixel_size),
        }
    }

    pub fn mosaic_coverage(&self) -> Option<MosaicCoverage> {
        self.mosaic.coverage(self.field_of_view(), self.resolution())
    }

    pub fn snapshot(&self) -> EquipmentSnapshot {
        EquipmentSnapshot {
            params: self.params,
            active_camera_id: self.active_camera_id.clone(),
            active_telescope_id: self.active_telescope_id.clone(),
            mosaic: self.mosaic,
        }
    }

    /// Rebuild the store from a persisted snapshot, re-clamping the mosaic
    /// against the current limits.
    pub fn from_snapshot(snapshot: EquipmentSnapshot, limits: MosaicLimits) -> Self {
        Self {
            params: snapshot.params,
            active_camera_id: snapshot.active_camera_id,
            active_telescope_id: snapshot.active_telescope_id,
            mosaic: snapshot.mosaic.clamped(&limits),
            limits,
        }
    }
}

/// The persisted subset of [`EquipmentStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSnapshot {
    pub params: EquipmentParameters,
    pub active_camera_id: Option<String>,
    pub active_telescope_id: Option<String>,
    pub mosaic: MosaicConfig,
}

impl Persisted for EquipmentSnapshot {
    const KEY: &'static str = "equipment";
    const VERSION: u32 = 1;

    fn to_payload(&self) -> StoreResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn from_payload(_version: u32, payload: Value) -> StoreResult<Self> {
        decode_payload(payload)
    }
}
