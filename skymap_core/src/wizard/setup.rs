//! First-run setup wizard.
//!
//! The wizard walks a fixed list of named steps. Leaving a step forward marks
//! it completed; advancing from the last step completes setup, closes the
//! wizard and rewinds it to the first step. Any step can be jumped to
//! directly once the wizard is open.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::cursor::{Advance, StepCursor};
use crate::error::StoreResult;
use crate::persistence::{decode_payload, Persisted};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetupStep {
    Welcome,
    Location,
    Equipment,
    Preferences,
    Complete,
}

impl SetupStep {
    /// Every step, in wizard order.
    pub const ALL: [SetupStep; 5] = [
        SetupStep::Welcome,
        SetupStep::Location,
        SetupStep::Equipment,
        SetupStep::Preferences,
        SetupStep::Complete,
    ];

    pub fn index(self) -> usize {
        match self {
            SetupStep::Welcome => 0,
            SetupStep::Location => 1,
            SetupStep::Equipment => 2,
            SetupStep::Preferences => 3,
            SetupStep::Complete => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SetupStep::Welcome => "welcome",
            SetupStep::Location => "location",
            SetupStep::Equipment => "equipment",
            SetupStep::Preferences => "preferences",
            SetupStep::Complete => "complete",
        }
    }
}

impl fmt::Display for SetupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SetupStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SetupStep::ALL
            .into_iter()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| format!("Unknown setup step: '{}'", s))
    }
}

/// Setup wizard state.
///
/// # Examples
///
/// ```
/// use skymap_core::wizard::{SetupStep, SetupWizard};
///
/// let mut wizard = SetupWizard::new();
/// wizard.open();
/// wizard.advance();
/// assert_eq!(wizard.current_step(), SetupStep::Location);
/// assert!(wizard.is_step_completed(SetupStep::Welcome));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SetupWizard {
    cursor: StepCursor,
    is_open: bool,
    has_completed_setup: bool,
    show_on_next_visit: bool,
    completed_steps: Vec<SetupStep>,
    completed_at: Option<DateTime<Utc>>,
}

impl Default for SetupWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl SetupWizard {
    pub fn new() -> Self {
        Self {
            cursor: StepCursor::new(SetupStep::ALL.len()),
            is_open: false,
            has_completed_setup: false,
            show_on_next_visit: true,
            completed_steps: Vec::new(),
            completed_at: None,
        }
    }

    pub fn current_step(&self) -> SetupStep {
        SetupStep::ALL[self.cursor.index()]
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn has_completed_setup(&self) -> bool {
        self.has_completed_setup
    }

    pub fn show_on_next_visit(&self) -> bool {
        self.show_on_next_visit
    }

    /// Completed steps in the order they were completed.
    pub fn completed_steps(&self) -> &[SetupStep] {
        &self.completed_steps
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn is_step_completed(&self, step: SetupStep) -> bool {
        self.completed_steps.contains(&step)
    }

    pub fn is_first_step(&self) -> bool {
        self.cursor.is_first()
    }

    pub fn is_last_step(&self) -> bool {
        self.cursor.is_last()
    }

    /// Fraction of steps completed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.completed_steps.len() as f64 / SetupStep::ALL.len() as f64
    }

    /// Whether the wizard should pop up when the application starts.
    pub fn should_show_on_startup(&self) -> bool {
        !self.has_completed_setup && self.show_on_next_visit
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn set_show_on_next_visit(&mut self, show: bool) {
        self.show_on_next_visit = show;
    }

    /// Move to the next step, or complete setup when on the last one.
    pub fn advance(&mut self) {
        match self.cursor.advance() {
            Advance::Moved { left } => {
                self.mark_step_completed(SetupStep::ALL[left]);
                log::debug!("Setup wizard advanced to '{}'", self.current_step());
            }
            Advance::PastEnd => self.complete(),
        }
    }

    /// Move to the previous step. No-op on the first step.
    pub fn retreat(&mut self) {
        if self.cursor.retreat() {
            log::debug!("Setup wizard went back to '{}'", self.current_step());
        }
    }

    /// Jump to any step. Completed steps are left alone.
    pub fn go_to_step(&mut self, step: SetupStep) {
        self.cursor.go_to(step.index());
        log::debug!("Setup wizard jumped to '{}'", step);
    }

    pub fn mark_step_completed(&mut self, step: SetupStep) {
        if !self.completed_steps.contains(&step) {
            self.completed_steps.push(step);
        }
    }

    /// Finish setup immediately, skipping whatever steps remain.
    pub fn skip_to_completion(&mut self) {
        log::debug!("Setup wizard skipped at '{}'", self.current_step());
        self.complete();
    }

    /// Start over: not completed, closed, on the first step, nothing
    /// completed. `show_on_next_visit` is a user preference and is kept.
    pub fn reset(&mut self) {
        self.has_completed_setup = false;
        self.is_open = false;
        self.cursor.rewind();
        self.completed_steps.clear();
        self.completed_at = None;
    }

    fn complete(&mut self) {
        self.has_completed_setup = true;
        self.is_open = false;
        self.cursor.rewind();
        self.completed_steps = SetupStep::ALL.to_vec();
        self.completed_at = Some(Utc::now());
        log::info!("Setup completed");
    }

    pub fn snapshot(&self) -> SetupWizardSnapshot {
        SetupWizardSnapshot {
            has_completed_setup: self.has_completed_setup,
            show_on_next_visit: self.show_on_next_visit,
            completed_steps: self.completed_steps.clone(),
            completed_at: self.completed_at,
        }
    }

    /// Rehydrate from a snapshot. The wizard comes back closed, on the
    /// first step.
    pub fn from_snapshot(snapshot: SetupWizardSnapshot) -> Self {
        let mut completed_steps = Vec::with_capacity(snapshot.completed_steps.len());
        for step in snapshot.completed_steps {
            if !completed_steps.contains(&step) {
                completed_steps.push(step);
            }
        }

        Self {
            has_completed_setup: snapshot.has_completed_setup,
            show_on_next_visit: snapshot.show_on_next_visit,
            completed_steps,
            completed_at: snapshot.completed_at,
            ..Self::new()
        }
    }
}

/// The persisted subset of [`SetupWizard`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupWizardSnapshot {
    pub has_completed_setup: bool,
    pub show_on_next_visit: bool,
    pub completed_steps: Vec<SetupStep>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Version 1 predates the show-on-next-visit toggle and the timestamp.
#[derive(Debug, Deserialize)]
struct SetupWizardSnapshotV1 {
    has_completed_setup: bool,
    #[serde(default)]
    completed_steps: Vec<SetupStep>,
}

fn setup_v1_to_v2(v1: SetupWizardSnapshotV1) -> SetupWizardSnapshot {
    SetupWizardSnapshot {
        has_completed_setup: v1.has_completed_setup,
        show_on_next_visit: !v1.has_completed_setup,
        completed_steps: v1.completed_steps,
        completed_at: None,
    }
}

impl Persisted for SetupWizardSnapshot {
    const KEY: &'static str = "setup_wizard";
    const VERSION: u32 = 2;

    fn to_payload(&self) -> StoreResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    fn from_payload(version: u32, payload: Value) -> StoreResult<Self> {
        match version {
            0 | 1 => Ok(setup_v1_to_v2(decode_payload(payload)?)),
            _ => decode_payload(payload),
        }
    }
}
