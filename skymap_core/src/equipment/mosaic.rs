//! Mosaic grid configuration and sky coverage.
//!
//! A mosaic is a `rows x cols` grid of frames that overlap their neighbours.
//! The overlap is either a percentage of the frame or a pixel count; in the
//! latter case it becomes a fraction of the sensor resolution per axis.

use serde::{Deserialize, Serialize};

use super::optics::{FieldOfView, Resolution};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapUnit {
    #[default]
    Percent,
    Pixels,
}

/// Upper bounds for the grid and the overlap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MosaicLimits {
    pub max_rows: u32,
    pub max_cols: u32,
    pub max_overlap_percent: f64,
    pub max_overlap_pixels: f64,
}

impl Default for MosaicLimits {
    fn default() -> Self {
        Self {
            max_rows: 10,
            max_cols: 10,
            max_overlap_percent: 50.0,
            max_overlap_pixels: 500.0,
        }
    }
}

impl MosaicLimits {
    fn clamp_rows(&self, rows: u32) -> u32 {
        rows.clamp(1, self.max_rows.max(1))
    }

    fn clamp_cols(&self, cols: u32) -> u32 {
        cols.clamp(1, self.max_cols.max(1))
    }

    fn clamp_overlap(&self, overlap: f64, unit: OverlapUnit) -> f64 {
        let max = match unit {
            OverlapUnit::Percent => self.max_overlap_percent,
            OverlapUnit::Pixels => self.max_overlap_pixels,
        };
        if overlap.is_nan() {
            0.0
        } else {
            overlap.clamp(0.0, max)
        }
    }
}

/// Mosaic settings as edited by the user.
///
/// Fields are private so rows and cols can never leave `[1, max]`; go
/// through the setters, which take the limits to clamp against.
/// Deserializing only enforces the lower bound of 1; apply
/// [`MosaicConfig::clamped`] to bring a decoded value under the limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMosaicConfig")]
pub struct MosaicConfig {
    enabled: bool,
    rows: u32,
    cols: u32,
    overlap: f64,
    overlap_unit: OverlapUnit,
}

#[derive(Deserialize)]
struct RawMosaicConfig {
    enabled: bool,
    rows: u32,
    cols: u32,
    overlap: f64,
    overlap_unit: OverlapUnit,
}

impl From<RawMosaicConfig> for MosaicConfig {
    fn from(raw: RawMosaicConfig) -> Self {
        Self {
            enabled: raw.enabled,
            rows: raw.rows.max(1),
            cols: raw.cols.max(1),
            overlap: if raw.overlap.is_finite() { raw.overlap.max(0.0) } else { 0.0 },
            overlap_unit: raw.overlap_unit,
        }
    }
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            rows: 2,
            cols: 2,
            overlap: 20.0,
            overlap_unit: OverlapUnit::Percent,
        }
    }
}

impl MosaicConfig {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn overlap(&self) -> f64 {
        self.overlap
    }

    pub fn overlap_unit(&self) -> OverlapUnit {
        self.overlap_unit
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_rows(&mut self, rows: u32, limits: &MosaicLimits) {
        self.rows = limits.clamp_rows(rows);
    }

    pub fn set_cols(&mut self, cols: u32, limits: &MosaicLimits) {
        self.cols = limits.clamp_cols(cols);
    }

    pub fn set_overlap(&mut self, overlap: f64, limits: &MosaicLimits) {
        self.overlap = limits.clamp_overlap(overlap, self.overlap_unit);
    }

    /// Switch units; the current overlap value is kept but re-clamped to
    /// the new unit's range.
    pub fn set_overlap_unit(&mut self, unit: OverlapUnit, limits: &MosaicLimits) {
        self.overlap_unit = unit;
        self.overlap = limits.clamp_overlap(self.overlap, unit);
    }

    /// Re-apply the limits to every field.
    ///
    /// Used after rehydrating a snapshot written under different limits.
    pub fn clamped(mut self, limits: &MosaicLimits) -> Self {
        self.rows = limits.clamp_rows(self.rows);
        self.cols = limits.clamp_cols(self.cols);
        self.overlap = limits.clamp_overlap(self.overlap, self.overlap_unit);
        self
    }

    pub fn total_panels(&self) -> u32 {
        self.rows.saturating_mul(self.cols)
    }

    /// Fraction of each frame that is new sky, per axis `(width, height)`.
    fn overlap_factors(&self, resolution: Resolution) -> (f64, f64) {
        match self.overlap_unit {
            OverlapUnit::Percent => {
                let factor = 1.0 - self.overlap / 100.0;
                (factor, factor)
            }
            OverlapUnit::Pixels => (
                pixel_overlap_factor(self.overlap, resolution.width),
                pixel_overlap_factor(self.overlap, resolution.height),
            ),
        }
    }

    /// Total sky covered by the grid, or `None` while the mosaic is disabled.
    pub fn coverage(&self, fov: FieldOfView, resolution: Resolution) -> Option<MosaicCoverage> {
        if !self.enabled {
            return None;
        }

        let (factor_w, factor_h) = self.overlap_factors(resolution);

        Some(MosaicCoverage {
            total_width_deg: span(fov.width_deg, self.cols, factor_w),
            total_height_deg: span(fov.height_deg, self.rows, factor_h),
            total_panels: self.total_panels(),
            panel_width_deg: fov.width_deg,
            panel_height_deg: fov.height_deg,
        })
    }
}

fn pixel_overlap_factor(overlap_px: f64, axis_px: u32) -> f64 {
    if axis_px == 0 {
        return 1.0;
    }
    (1.0 - overlap_px / axis_px as f64).clamp(0.0, 1.0)
}

/// `n` frames advancing by `fov * factor` each, plus the trailing overlap.
fn span(fov_deg: f64, n: u32, factor: f64) -> f64 {
    fov_deg * n as f64 * factor + fov_deg * (1.0 - factor)
}

/// Angular extent of a mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MosaicCoverage {
    pub total_width_deg: f64,
    pub total_height_deg: f64,
    pub total_panels: u32,
    pub panel_width_deg: f64,
    pub panel_height_deg: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    fn enabled(rows: u32, cols: u32, overlap: f64, unit: OverlapUnit) -> MosaicConfig {
        let limits = MosaicLimits::default();
        let mut config = MosaicConfig::default();
        config.set_enabled(true);
        config.set_rows(rows, &limits);
        config.set_cols(cols, &limits);
        config.set_overlap_unit(unit, &limits);
        config.set_overlap(overlap, &limits);
        config
    }

    const FOV: FieldOfView = FieldOfView {
        width_deg: 3.0,
        height_deg: 2.0,
    };
    const RES: Resolution = Resolution {
        width: 6000,
        height: 4000,
    };

    #[test]
    fn test_disabled_is_none() {
        let mut config = enabled(3, 3, 10.0, OverlapUnit::Percent);
        config.set_enabled(false);
        assert!(config.coverage(FOV, RES).is_none());
    }

    #[test]
    fn test_single_panel_equals_fov() {
        let config = enabled(1, 1, 30.0, OverlapUnit::Percent);
        let cov = config.coverage(FOV, RES).unwrap();
        assert_eq!(cov.total_panels, 1);
        assert!(approx_eq(cov.total_width_deg, 3.0, 1e-12));
        assert!(approx_eq(cov.total_height_deg, 2.0, 1e-12));
    }

    #[test]
    fn test_percent_overlap() {
        // 3 cols, 20%: 3 * 3 * 0.8 + 3 * 0.2 = 7.8
        // 2 rows, 20%: 2 * 2 * 0.8 + 2 * 0.2 = 3.6
        let config = enabled(2, 3, 20.0, OverlapUnit::Percent);
        let cov = config.coverage(FOV, RES).unwrap();
        assert_eq!(cov.total_panels, 6);
        assert!(approx_eq(cov.total_width_deg, 7.8, 1e-9));
        assert!(approx_eq(cov.total_height_deg, 3.6, 1e-9));
        assert_eq!(cov.panel_width_deg, 3.0);
    }

    #[test]
    fn test_pixel_overlap_uses_axis_resolution() {
        let config = enabled(2, 2, 400.0, OverlapUnit::Pixels);
        let cov = config.coverage(FOV, RES).unwrap();
        let fw = 1.0 - 400.0 / 6000.0;
        let fh = 1.0 - 400.0 / 4000.0;
        assert!(approx_eq(cov.total_width_deg, 3.0 * 2.0 * fw + 3.0 * (1.0 - fw), 1e-9));
        assert!(approx_eq(cov.total_height_deg, 2.0 * 2.0 * fh + 2.0 * (1.0 - fh), 1e-9));
    }

    #[test]
    fn test_zero_resolution_means_no_overlap() {
        let config = enabled(2, 2, 100.0, OverlapUnit::Pixels);
        let cov = config
            .coverage(FOV, Resolution { width: 0, height: 0 })
            .unwrap();
        assert!(approx_eq(cov.total_width_deg, 6.0, 1e-12));
    }

    #[test]
    fn test_rows_and_cols_clamped() {
        let limits = MosaicLimits::default();
        let mut config = MosaicConfig::default();
        config.set_rows(0, &limits);
        config.set_cols(99, &limits);
        assert_eq!(config.rows(), 1);
        assert_eq!(config.cols(), 10);
    }

    #[test]
    fn test_overlap_clamped_per_unit() {
        let limits = MosaicLimits::default();
        let mut config = MosaicConfig::default();
        config.set_overlap(80.0, &limits);
        assert_eq!(config.overlap(), 50.0);
        config.set_overlap(-3.0, &limits);
        assert_eq!(config.overlap(), 0.0);

        config.set_overlap_unit(OverlapUnit::Pixels, &limits);
        config.set_overlap(450.0, &limits);
        assert_eq!(config.overlap(), 450.0);

        config.set_overlap_unit(OverlapUnit::Percent, &limits);
        assert_eq!(config.overlap(), 50.0);
    }

    #[test]
    fn test_deserialize_raises_empty_grid_to_one_panel() {
        let config: MosaicConfig = serde_json::from_str(
            r#"{"enabled":true,"rows":0,"cols":0,"overlap":-5.0,"overlap_unit":"percent"}"#,
        )
        .unwrap();
        assert_eq!(config.rows(), 1);
        assert_eq!(config.cols(), 1);
        assert_eq!(config.overlap(), 0.0);
        assert_eq!(config.total_panels(), 1);
    }

    #[test]
    fn test_oversized_grid_does_not_overflow() {
        let config: MosaicConfig = serde_json::from_str(
            r#"{"enabled":true,"rows":100000,"cols":100000,"overlap":10.0,"overlap_unit":"percent"}"#,
        )
        .unwrap();
        assert_eq!(config.total_panels(), u32::MAX);

        let coverage = config.coverage(FOV, RES).unwrap();
        assert_eq!(coverage.total_panels, u32::MAX);

        let limited = config.clamped(&MosaicLimits::default());
        assert_eq!(limited.rows(), 10);
        assert_eq!(limited.total_panels(), 100);
    }

    #[test]
    fn test_clamped_applies_tighter_limits() {
        let config = enabled(8, 9, 40.0, OverlapUnit::Percent);
        let tight = MosaicLimits {
            max_rows: 4,
            max_cols: 4,
            max_overlap_percent: 25.0,
            max_overlap_pixels: 100.0,
        };
        let clamped = config.clamped(&tight);
        assert_eq!(clamped.rows(), 4);
        assert_eq!(clamped.cols(), 4);
        assert_eq!(clamped.overlap(), 25.0);
        assert!(clamped.enabled());
    }
}
