//! GPS <-> floor-plan pixel mapping over a fixed set of control points.

mod control_points;
mod mapper;
mod parse;

pub use control_points::{
    control_point, ControlPoint, ControlTable, MapBounds, CONTROL_POINTS, CONTROL_POINT_COUNT,
    MAP_BOUNDS,
};
pub use mapper::{
    distance, interpolate, CoordinateMapper, GpsResult, Interpolation, PixelResult,
    PointResidual, ValidationReport, GPS_MATCH_THRESHOLD, IDW_POWER, PIXEL_MATCH_THRESHOLD,
};
pub use parse::{parse_args, parse_number, parse_pair, ParseError};
