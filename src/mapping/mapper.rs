//! Bidirectional GPS <-> pixel mapping by inverse distance weighting.
//!
//! Both directions share one interpolation routine: every control point
//! contributes its known value with weight `1 / distance^2`, where distance is
//! plain Euclidean distance in the query's own space (degrees for GPS queries,
//! pixels for pixel queries). A query that lands on a control point returns
//! that point's stored value directly.

use serde::Serialize;
use tracing::{debug, info};

use super::control_points::{ControlPoint, ControlTable, MapBounds, CONTROL_POINTS, MAP_BOUNDS};

/// Distance in degrees below which a GPS query snaps to a control point.
pub const GPS_MATCH_THRESHOLD: f64 = 1e-7;

/// Distance in pixels below which a pixel query snaps to a control point.
pub const PIXEL_MATCH_THRESHOLD: f64 = 0.1;

/// Exponent applied to distances when weighting control points.
pub const IDW_POWER: i32 = 2;

/// Result of converting a GPS coordinate to image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelResult {
    pub pixel_x: f64,
    pub pixel_y: f64,
    /// False when the estimate fell outside the map bounds and was clamped.
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_point: Option<&'static str>,
}

/// Result of converting image pixels to a GPS coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GpsResult {
    pub lat: f64,
    pub lng: f64,
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_point: Option<&'static str>,
}

/// Round-trip residual for one control point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointResidual {
    pub name: &'static str,
    pub expected_x: f64,
    pub expected_y: f64,
    pub actual_x: f64,
    pub actual_y: f64,
    /// Euclidean pixel distance between expected and recovered position.
    pub error: f64,
    pub matched_point: Option<&'static str>,
}

/// Output of [`CoordinateMapper::validate_reference_points`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub points: Vec<PointResidual>,
    pub mean_error: f64,
    pub max_error: f64,
}

impl ValidationReport {
    /// Whether every control point was recovered without error.
    pub fn is_exact(&self) -> bool {
        self.max_error == 0.0
    }
}

/// Outcome of one interpolation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interpolation<'a> {
    /// The query sits on this control point (first match in table order).
    Matched(&'a ControlPoint),
    /// Weighted estimate over all control points.
    Estimate(f64, f64),
}

/// Euclidean distance between two 2D points.
pub fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    (a.0 - b.0).hypot(a.1 - b.1)
}

/// Inverse distance weighted interpolation over a control table.
///
/// `position` selects the coordinate space distances are measured in and
/// `value` selects the quantity being averaged. The first point closer than
/// `match_threshold` short-circuits the average.
///
/// Weights are taken relative to the nearest point, `(d_min / d)^2`, which
/// normalizes to the same average as `1 / d^2` without overflowing for
/// queries far outside the calibrated area.
pub fn interpolate<'a, P, V>(
    table: &'a [ControlPoint],
    query: (f64, f64),
    match_threshold: f64,
    position: P,
    value: V,
) -> Interpolation<'a>
where
    P: Fn(&ControlPoint) -> (f64, f64),
    V: Fn(&ControlPoint) -> (f64, f64),
{
    let mut nearest = f64::INFINITY;
    for point in table {
        let d = distance(query, position(point));
        if d < match_threshold {
            return Interpolation::Matched(point);
        }
        nearest = nearest.min(d);
    }

    let mut weight_sum = 0.0;
    let mut sum_a = 0.0;
    let mut sum_b = 0.0;

    for point in table {
        let d = distance(query, position(point));
        // Every distance overflowed: all points are equally far away.
        let weight = if nearest.is_infinite() {
            1.0
        } else {
            (nearest / d).powi(IDW_POWER)
        };
        let (a, b) = value(point);
        weight_sum += weight;
        sum_a += weight * a;
        sum_b += weight * b;
    }

    Interpolation::Estimate(sum_a / weight_sum, sum_b / weight_sum)
}

/// Clamp to `[0, max]`. Unlike `f64::clamp` this never panics on a negative
/// or NaN `max`.
fn clamp_axis(value: f64, max: f64) -> f64 {
    value.max(0.0).min(max)
}

/// Converts between GPS coordinates and floor-plan pixels.
///
/// Stateless apart from its read-only calibration table, so a single
/// instance can be shared freely across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateMapper {
    table: ControlTable,
    bounds: MapBounds,
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinateMapper {
    /// Mapper over the compiled-in station calibration.
    pub const fn new() -> Self {
        Self {
            table: CONTROL_POINTS,
            bounds: MAP_BOUNDS,
        }
    }

    /// Mapper over a different calibration table and image size.
    ///
    /// `bounds` should have finite, non-negative dimensions (see
    /// [`MapBounds::is_well_formed`]). Malformed bounds never panic, but the
    /// clamped output is then meaningless.
    pub const fn with_calibration(table: ControlTable, bounds: MapBounds) -> Self {
        Self { table, bounds }
    }

    pub fn control_points(&self) -> &[ControlPoint] {
        &self.table
    }

    pub fn bounds(&self) -> MapBounds {
        self.bounds
    }

    /// Convert a GPS coordinate to a pixel position on the floor plan.
    ///
    /// Interpolated results are rounded to whole pixels and clamped, X to
    /// `[0, height]` and Y to `[0, width]`. Clamping clears `is_valid`.
    pub fn gps_to_pixel(&self, lat: f64, lng: f64) -> PixelResult {
        match interpolate(
            &self.table,
            (lat, lng),
            GPS_MATCH_THRESHOLD,
            |p| (p.lat, p.lng),
            |p| (p.pixel_x, p.pixel_y),
        ) {
            Interpolation::Matched(point) => {
                debug!(
                    lat,
                    lng,
                    pixel_x = point.pixel_x,
                    pixel_y = point.pixel_y,
                    matched = point.name,
                    "gps_to_pixel matched control point"
                );
                PixelResult {
                    pixel_x: point.pixel_x,
                    pixel_y: point.pixel_y,
                    is_valid: true,
                    matched_point: Some(point.name),
                }
            }
            Interpolation::Estimate(x, y) => {
                let raw_x = x.round();
                let raw_y = y.round();
                let pixel_x = clamp_axis(raw_x, self.bounds.height);
                let pixel_y = clamp_axis(raw_y, self.bounds.width);
                let clamped = pixel_x != raw_x || pixel_y != raw_y;

                debug!(
                    lat,
                    lng,
                    raw_x,
                    raw_y,
                    pixel_x,
                    pixel_y,
                    clamped,
                    "gps_to_pixel interpolated"
                );
                PixelResult {
                    pixel_x,
                    pixel_y,
                    is_valid: !clamped,
                    matched_point: None,
                }
            }
        }
    }

    /// Convert a floor-plan pixel position to a GPS coordinate.
    ///
    /// Geodetic output is never clamped, so the result is always valid.
    pub fn pixel_to_gps(&self, pixel_x: f64, pixel_y: f64) -> GpsResult {
        match interpolate(
            &self.table,
            (pixel_x, pixel_y),
            PIXEL_MATCH_THRESHOLD,
            |p| (p.pixel_x, p.pixel_y),
            |p| (p.lat, p.lng),
        ) {
            Interpolation::Matched(point) => {
                debug!(
                    pixel_x,
                    pixel_y,
                    lat = point.lat,
                    lng = point.lng,
                    matched = point.name,
                    "pixel_to_gps matched control point"
                );
                GpsResult {
                    lat: point.lat,
                    lng: point.lng,
                    is_valid: true,
                    matched_point: Some(point.name),
                }
            }
            Interpolation::Estimate(lat, lng) => {
                debug!(pixel_x, pixel_y, lat, lng, "pixel_to_gps interpolated");
                GpsResult {
                    lat,
                    lng,
                    is_valid: true,
                    matched_point: None,
                }
            }
        }
    }

    /// Round-trip every control point through [`gps_to_pixel`](Self::gps_to_pixel)
    /// and report the pixel error.
    pub fn validate_reference_points(&self) -> ValidationReport {
        let points: Vec<PointResidual> = self
            .table
            .iter()
            .map(|point| {
                let result = self.gps_to_pixel(point.lat, point.lng);
                PointResidual {
                    name: point.name,
                    expected_x: point.pixel_x,
                    expected_y: point.pixel_y,
                    actual_x: result.pixel_x,
                    actual_y: result.pixel_y,
                    error: distance(
                        (point.pixel_x, point.pixel_y),
                        (result.pixel_x, result.pixel_y),
                    ),
                    matched_point: result.matched_point,
                }
            })
            .collect();

        let total: f64 = points.iter().map(|p| p.error).sum();
        let mean_error = total / points.len() as f64;
        let max_error = points.iter().map(|p| p.error).fold(0.0, f64::max);

        info!(
            points = points.len(),
            mean_error, max_error, "validated reference points"
        );

        ValidationReport {
            points,
            mean_error,
            max_error,
        }
    }
}
