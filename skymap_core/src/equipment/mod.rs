//! Camera/telescope parameters and the optical quantities derived from them.

pub mod mosaic;
pub mod optics;
pub mod presets;
pub mod store;

pub use mosaic::{MosaicConfig, MosaicCoverage, MosaicLimits, OverlapUnit};
pub use optics::{FieldOfView, Resolution};
pub use presets::{
    camera_presets, find_camera_preset, find_telescope_preset, telescope_presets, CameraPreset,
    TelescopePreset, TelescopeType,
};
pub use store::{EquipmentParameters, EquipmentSnapshot, EquipmentStore};
