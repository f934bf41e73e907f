//! SkyMap core - equipment model, setup sequencers and persisted settings.
//!
//! The crate holds the state containers behind the settings, onboarding and
//! equipment screens. Nothing here is global: build a [`SkyMapContext`] and
//! pass it (or the individual stores) to whoever needs them.

pub mod config;
pub mod context;
pub mod equipment;
pub mod error;
pub mod persistence;
pub mod settings;
pub mod wizard;

pub use config::SkyMapConfig;
pub use context::SkyMapContext;
pub use equipment::{CameraPreset, EquipmentParameters, EquipmentStore, TelescopePreset};
pub use error::{StoreError, StoreResult};
pub use persistence::{FileStore, MemoryStore, Persisted, Snapshot, SnapshotStore};
pub use settings::{AppSettings, SettingUpdate, SettingsStore};
pub use wizard::{OnboardingTour, SetupStep, SetupWizard};
