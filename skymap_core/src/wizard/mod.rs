//! Step sequencers for the first-run setup wizard and the onboarding tour.

pub mod cursor;
pub mod setup;
pub mod tour;

pub use cursor::{Advance, StepCursor};
pub use setup::{SetupStep, SetupWizard, SetupWizardSnapshot};
pub use tour::{OnboardingTour, TourSnapshot, TourStep, DEFAULT_TOUR_STEPS};
