//! File-backed marker and class storage.

mod map_store;
mod model;

pub use map_store::{MapStore, Pin, StoreError, CLASSES_FILE, MARKERS_FILE};
pub use model::{Marker, MarkerClass, MarkerUpdate, NewMarker};
