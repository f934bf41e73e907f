//! Onboarding tour: an index-based walk over highlighted UI elements.
//!
//! Same navigation rules as the setup wizard, but positions are plain
//! zero-based indices into a step list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::cursor::{Advance, StepCursor};
use crate::error::StoreResult;
use crate::persistence::{decode_payload, Persisted};

/// One stop on the tour: an id and the UI anchor it highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TourStep {
    pub id: &'static str,
    pub target: &'static str,
}

pub const DEFAULT_TOUR_STEPS: &[TourStep] = &[
    TourStep { id: "welcome", target: "sky-canvas" },
    TourStep { id: "search", target: "search-bar" },
    TourStep { id: "navigation", target: "navigation-controls" },
    TourStep { id: "time", target: "time-controls" },
    TourStep { id: "equipment", target: "equipment-panel" },
    TourStep { id: "settings", target: "settings-button" },
    TourStep { id: "finish", target: "sky-canvas" },
];

#[derive(Debug, Clone, PartialEq)]
pub struct OnboardingTour {
    steps: &'static [TourStep],
    cursor: StepCursor,
    is_active: bool,
    has_completed_tour: bool,
    completed_at: Option<DateTime<Utc>>,
}

impl Default for OnboardingTour {
    fn default() -> Self {
        Self::new(DEFAULT_TOUR_STEPS)
    }
}

impl OnboardingTour {
    /// A tour over `steps`, which must not be empty.
    pub fn new(steps: &'static [TourStep]) -> Self {
        Self {
            steps,
            cursor: StepCursor::new(steps.len()),
            is_active: false,
            has_completed_tour: false,
            completed_at: None,
        }
    }

    pub fn steps(&self) -> &'static [TourStep] {
        self.steps
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn current_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn current_step(&self) -> &'static TourStep {
        &self.steps[self.cursor.index()]
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn has_completed_tour(&self) -> bool {
        self.has_completed_tour
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn is_first_step(&self) -> bool {
        self.cursor.is_first()
    }

    pub fn is_last_step(&self) -> bool {
        self.cursor.is_last()
    }

    /// Activate the tour from its first step.
    pub fn start(&mut self) {
        self.cursor.rewind();
        self.is_active = true;
        log::debug!("Tour started");
    }

    /// Next step, or finish the tour from the last one.
    pub fn next_step(&mut self) {
        match self.cursor.advance() {
            Advance::Moved { .. } => {
                log::debug!("Tour moved to step {}", self.cursor.index());
            }
            Advance::PastEnd => self.complete(),
        }
    }

    /// Previous step. No-op on the first step.
    pub fn prev_step(&mut self) {
        self.cursor.retreat();
    }

    /// Jump to `index`. Out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) {
        if !self.cursor.go_to(index) {
            log::debug!("Ignoring tour jump to {} of {}", index, self.total_steps());
        }
    }

    pub fn skip(&mut self) {
        self.complete();
    }

    pub fn reset(&mut self) {
        self.cursor.rewind();
        self.is_active = false;
        self.has_completed_tour = false;
        self.completed_at = None;
    }

    fn complete(&mut self) {
        self.has_completed_tour = true;
        self.is_active = false;
        self.cursor.rewind();
        self.completed_at = Some(Utc::now());
        log::info!("Onboarding tour completed");
    }

    pub fn snapshot(&self) -> TourSnapshot {
        TourSnapshot {
            has_completed_tour: self.has_completed_tour,
            completed_at: self.completed_at,
        }
    }

    pub fn from_snapshot(steps: &'static [TourStep], snapshot: TourSnapshot) -> Self {
        Self {
            has_completed_tour: snapshot.has_completed_tour,
            completed_at: snapshot.completed_at,
            ..Self::new(steps)
        }
    }
}

/// The persisted subset of [`OnboardingTour`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourSnapshot {
    pub has_completed_tour: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Persisted for TourSnapshot {
    const KEY: &'static str = "onboarding_tour";
    const VERSION: u32 = 1;

    fn to_payload(&self) -> StoreResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn from_payload(_version: u32, payload: Value) -> StoreResult<Self> {
        decode_payload(payload)
    }
}
