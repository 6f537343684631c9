//! Calibration data for the station floor plan.
//!
//! The nine control points anchor the floor-plan image to GPS coordinates:
//! the four corners, the four edge midpoints and the center of the scan.
//! Both tables are compiled in; recalibrating for another floor plan means
//! editing this file.

use serde::Serialize;

/// A location known in both pixel space and geodetic space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlPoint {
    pub name: &'static str,
    pub pixel_x: f64,
    pub pixel_y: f64,
    pub lat: f64,
    pub lng: f64,
}

impl ControlPoint {
    pub const fn new(name: &'static str, pixel_x: f64, pixel_y: f64, lat: f64, lng: f64) -> Self {
        Self {
            name,
            pixel_x,
            pixel_y,
            lat,
            lng,
        }
    }
}

/// Pixel dimensions of the reference image.
///
/// Only used to clamp `gps_to_pixel` output. Note the pairing used there:
/// `height` bounds the X axis and `width` bounds the Y axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapBounds {
    pub width: f64,
    pub height: f64,
}

impl MapBounds {
    /// Both dimensions are finite and non-negative.
    pub fn is_well_formed(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// Number of entries in a calibration table.
pub const CONTROL_POINT_COUNT: usize = 9;

/// A full calibration table, in declaration (tie-breaking) order.
pub type ControlTable = [ControlPoint; CONTROL_POINT_COUNT];

/// Bounds of the rendered floor plan.
///
/// With the height/width pairing above, `height` covers the full X extent of
/// the scan (0..=7599) but `width` stops at 3800 while the scan runs to 8020
/// in Y. Any interpolated Y past 3800 is clamped to 3800 and reported
/// invalid, so markers in the lower half of the plan render on that line
/// with a warning. Exact control-point matches are not clamped.
pub const MAP_BOUNDS: MapBounds = MapBounds {
    width: 3800.0,
    height: 7599.0,
};

pub const CONTROL_POINTS: ControlTable = [
    ControlPoint::new("topLeft", 0.0, 0.0, 37.99279736150312, 32.63456638780986),
    ControlPoint::new("topCenter", 3800.0, 0.0, 37.99249732202424, 32.63511646018781),
    ControlPoint::new("topRight", 7599.0, 0.0, 37.99219736150312, 32.63566638780986),
    ControlPoint::new("middleLeft", 0.0, 4010.0, 37.99321639544662, 32.63507808953558),
    ControlPoint::new("center", 3800.0, 4010.0, 37.99291635596774, 32.63562816191352),
    ControlPoint::new("middleRight", 7599.0, 4010.0, 37.99261639544662, 32.63617808953558),
    ControlPoint::new("bottomLeft", 0.0, 8020.0, 37.99363542939012, 32.63558979126129),
    ControlPoint::new("bottomCenter", 3800.0, 8020.0, 37.99333538991124, 32.63613986363924),
    ControlPoint::new("bottomRight", 7599.0, 8020.0, 37.99303542939012, 32.63668979126129),
];

/// Look up a control point by name.
pub fn control_point(name: &str) -> Option<&'static ControlPoint> {
    CONTROL_POINTS.iter().find(|p| p.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<&str> = CONTROL_POINTS.iter().map(|p| p.name).collect();
        assert_eq!(names.len(), CONTROL_POINT_COUNT);
    }

    #[test]
    fn test_corners_span_the_scan() {
        let top_left = control_point("topLeft").unwrap();
        let bottom_right = control_point("bottomRight").unwrap();
        assert_eq!((top_left.pixel_x, top_left.pixel_y), (0.0, 0.0));
        assert_eq!((bottom_right.pixel_x, bottom_right.pixel_y), (7599.0, 8020.0));

        let center = control_point("center").unwrap();
        assert!(center.pixel_x > top_left.pixel_x && center.pixel_x < bottom_right.pixel_x);
        assert!(center.pixel_y > top_left.pixel_y && center.pixel_y < bottom_right.pixel_y);
    }

    #[test]
    fn test_unknown_point() {
        assert!(control_point("nowhere").is_none());
    }
}
