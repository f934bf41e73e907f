//! Explicit container for every store.
//!
//! Consumers receive a `SkyMapContext` (or a reference to one of its stores)
//! instead of reaching for process-wide singletons.

use crate::config::SkyMapConfig;
use crate::equipment::{EquipmentSnapshot, EquipmentStore};
use crate::error::StoreResult;
use crate::persistence::{self, FileStore, Persisted, SnapshotStore};
use crate::settings::{AppSettings, SettingsStore};
use crate::wizard::{OnboardingTour, SetupWizard, SetupWizardSnapshot, TourSnapshot, DEFAULT_TOUR_STEPS};

pub struct SkyMapContext {
    pub equipment: EquipmentStore,
    pub wizard: SetupWizard,
    pub tour: OnboardingTour,
    pub settings: SettingsStore,
    config: SkyMapConfig,
    store: Box<dyn SnapshotStore>,
}

impl SkyMapContext {
    /// Fresh state with nothing loaded from `store`.
    pub fn new(config: SkyMapConfig, store: Box<dyn SnapshotStore>) -> Self {
        Self {
            equipment: EquipmentStore::new(config.mosaic_limits()),
            wizard: SetupWizard::new(),
            tour: OnboardingTour::default(),
            settings: SettingsStore::default(),
            config,
            store,
        }
    }

    /// Rehydrate every store from `store`.
    ///
    /// A snapshot that is missing starts from defaults; one that fails to
    /// restore is logged and also replaced by defaults.
    pub fn load(config: SkyMapConfig, store: Box<dyn SnapshotStore>) -> Self {
        let verify = config.storage.verify_checksums;
        let mut ctx = Self::new(config, store);

        if let Some(snapshot) = restore_or_default::<EquipmentSnapshot>(ctx.store.as_ref(), verify) {
            ctx.equipment = EquipmentStore::from_snapshot(snapshot, ctx.config.mosaic_limits());
        }
        if let Some(snapshot) = restore_or_default::<SetupWizardSnapshot>(ctx.store.as_ref(), verify) {
            ctx.wizard = SetupWizard::from_snapshot(snapshot);
        }
        if let Some(snapshot) = restore_or_default::<TourSnapshot>(ctx.store.as_ref(), verify) {
            ctx.tour = OnboardingTour::from_snapshot(DEFAULT_TOUR_STEPS, snapshot);
        }
        if let Some(settings) = restore_or_default::<AppSettings>(ctx.store.as_ref(), verify) {
            ctx.settings = SettingsStore::new(settings);
        }

        ctx
    }

    /// [`SkyMapContext::load`] from a [`FileStore`] rooted at
    /// `config.storage.data_dir`, creating the directory if needed.
    pub fn open(config: SkyMapConfig) -> StoreResult<Self> {
        let store = FileStore::open(&config.storage.data_dir)?;
        log::info!("Opening sky map state in {}", store.dir().display());
        Ok(Self::load(config, Box::new(store)))
    }

    pub fn config(&self) -> &SkyMapConfig {
        &self.config
    }

    pub fn snapshot_store(&self) -> &dyn SnapshotStore {
        self.store.as_ref()
    }

    /// Write every store's snapshot, stopping at the first failure.
    pub fn persist(&self) -> StoreResult<()> {
        persistence::save(self.store.as_ref(), &self.equipment.snapshot())?;
        persistence::save(self.store.as_ref(), &self.wizard.snapshot())?;
        persistence::save(self.store.as_ref(), &self.tour.snapshot())?;
        persistence::save(self.store.as_ref(), self.settings.settings())?;
        Ok(())
    }

    /// [`SkyMapContext::persist`], logging instead of returning a failure.
    pub fn persist_or_log(&self) {
        if let Err(e) = self.persist() {
            log::warn!("Failed to persist state: {}", e);
        }
    }
}

fn restore_or_default<T: Persisted>(store: &dyn SnapshotStore, verify: bool) -> Option<T> {
    match persistence::load::<T>(store, verify) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Discarding '{}' snapshot: {}", T::KEY, e);
            None
        }
    }
}
