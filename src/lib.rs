// Copyright 2025 The station-map Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Station Map
//!
//! Backend pieces of the fire station orientation map.
//!
//! The floor-plan image is calibrated against GPS with nine control points.
//! [`CoordinateMapper`] converts between the two spaces with inverse distance
//! weighting, and [`MapStore`] keeps the labeled points of interest and their
//! classes in JSON files.
//!
//! ## Example
//!
//! ```rust
//! use station_map::CoordinateMapper;
//!
//! let mapper = CoordinateMapper::new();
//!
//! let pin = mapper.gps_to_pixel(37.99279736150312, 32.63456638780986);
//! assert_eq!((pin.pixel_x, pin.pixel_y), (0.0, 0.0));
//! assert_eq!(pin.matched_point, Some("topLeft"));
//!
//! let spot = mapper.pixel_to_gps(7599.0, 8020.0);
//! assert_eq!(spot.matched_point, Some("bottomRight"));
//!
//! assert!(mapper.validate_reference_points().is_exact());
//! ```

pub mod mapping;
pub mod settings;
pub mod store;

pub use mapping::{
    ControlPoint, CoordinateMapper, GpsResult, MapBounds, PixelResult, ValidationReport,
    CONTROL_POINTS, MAP_BOUNDS,
};
pub use settings::AppSettings;
pub use store::{MapStore, Marker, MarkerClass, MarkerUpdate, NewMarker, StoreError};
