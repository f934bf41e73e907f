//! Optical formulas for camera + telescope combinations.
//!
//! All functions are pure and take plain millimetre / micrometre values.
//! They never fail: degenerate inputs produce sentinels (see [`f_ratio`]).

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Radians to degrees.
pub const RAD_TO_DEG: f64 = 180.0 / PI;

/// Arcseconds per radian scaled for pixel size in µm over focal length in mm.
pub const IMAGE_SCALE_FACTOR: f64 = 206.265;

/// Angular field of view in degrees along one sensor axis.
///
/// `fov = 2 * atan(sensor / (2 * focal_length))`, converted to degrees.
///
/// # Examples
///
/// ```
/// use skymap_core::equipment::optics::field_of_view_deg;
///
/// let fov = field_of_view_deg(23.5, 400.0);
/// assert!((fov - 3.3638).abs() < 1e-4);
/// ```
pub fn field_of_view_deg(sensor_dimension_mm: f64, focal_length_mm: f64) -> f64 {
    2.0 * (sensor_dimension_mm / (2.0 * focal_length_mm)).atan() * RAD_TO_DEG
}

/// Image scale in arcseconds per pixel.
pub fn image_scale_arcsec(pixel_size_um: f64, focal_length_mm: f64) -> f64 {
    IMAGE_SCALE_FACTOR * pixel_size_um / focal_length_mm
}

/// Focal ratio, or `0.0` when the aperture is not positive.
///
/// # Examples
///
/// ```
/// use skymap_core::equipment::optics::f_ratio;
///
/// assert_eq!(f_ratio(400.0, 80.0), 5.0);
/// assert_eq!(f_ratio(400.0, 0.0), 0.0);
/// ```
pub fn f_ratio(focal_length_mm: f64, aperture_mm: f64) -> f64 {
    if aperture_mm > 0.0 {
        focal_length_mm / aperture_mm
    } else {
        0.0
    }
}

/// Pixel count along one sensor axis.
pub fn resolution_px(sensor_dimension_mm: f64, pixel_size_um: f64) -> u32 {
    (sensor_dimension_mm * 1000.0 / pixel_size_um).round() as u32
}

/// Field of view of a sensor through a given focal length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldOfView {
    pub width_deg: f64,
    pub height_deg: f64,
}

impl FieldOfView {
    pub fn new(sensor_width_mm: f64, sensor_height_mm: f64, focal_length_mm: f64) -> Self {
        Self {
            width_deg: field_of_view_deg(sensor_width_mm, focal_length_mm),
            height_deg: field_of_view_deg(sensor_height_mm, focal_length_mm),
        }
    }

    pub fn width_arcmin(&self) -> f64 {
        self.width_deg * 60.0
    }

    pub fn height_arcmin(&self) -> f64 {
        self.height_deg * 60.0
    }
}

/// Sensor size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPSILON: f64 = 1e-6;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_fov_aps_c_at_400mm() {
        let fov = field_of_view_deg(23.5, 400.0);
        let expected = 2.0 * (23.5f64 / 800.0).atan() * 180.0 / PI;
        assert!(approx_eq(fov, expected, EPSILON));
        assert!(approx_eq(fov, 3.3638, 1e-4), "got {}", fov);
    }

    #[test]
    fn test_fov_full_frame_50mm() {
        let fov = FieldOfView::new(36.0, 24.0, 50.0);
        assert!(fov.width_deg > 39.0 && fov.width_deg < 40.0, "width {}", fov.width_deg);
        assert!(fov.height_deg > 26.0 && fov.height_deg < 27.5, "height {}", fov.height_deg);
        assert!(approx_eq(fov.width_arcmin(), fov.width_deg * 60.0, EPSILON));
        assert!(approx_eq(fov.height_arcmin(), fov.height_deg * 60.0, EPSILON));
    }

    #[test]
    fn test_image_scale() {
        let scale = image_scale_arcsec(5.0, 1000.0);
        assert!(approx_eq(scale, 1.031325, EPSILON));
    }

    #[test]
    fn test_f_ratio_zero_aperture_is_zero() {
        assert_eq!(f_ratio(400.0, 0.0), 0.0);
        assert_eq!(f_ratio(400.0, -10.0), 0.0);
        assert_eq!(f_ratio(400.0, 80.0), 5.0);
    }

    #[test]
    fn test_resolution_rounds() {
        // 23.5mm / 3.76µm = 6250.0
        assert_eq!(resolution_px(23.5, 3.76), 6250);
        // 15.7mm / 3.76µm = 4175.5 -> 4176
        assert_eq!(resolution_px(15.7, 3.76), 4176);
    }

    proptest! {
        #[test]
        fn prop_fov_in_open_range(sensor in 0.01..500.0f64, focal in 0.01..10000.0f64) {
            let fov = field_of_view_deg(sensor, focal);
            prop_assert!(fov > 0.0);
            prop_assert!(fov < 180.0);
        }

        #[test]
        fn prop_fov_increases_with_sensor(sensor in 1.0..100.0f64, delta in 0.1..10.0f64, focal in 10.0..5000.0f64) {
            prop_assert!(field_of_view_deg(sensor + delta, focal) > field_of_view_deg(sensor, focal));
        }

        #[test]
        fn prop_fov_decreases_with_focal_length(sensor in 1.0..100.0f64, focal in 10.0..5000.0f64, delta in 1.0..500.0f64) {
            prop_assert!(field_of_view_deg(sensor, focal + delta) < field_of_view_deg(sensor, focal));
        }

        #[test]
        fn prop_f_ratio_matches_division(focal in 1.0..5000.0f64, aperture in 1.0..1000.0f64) {
            prop_assert_eq!(f_ratio(focal, aperture), focal / aperture);
        }
    }
}
