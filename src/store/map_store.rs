//! File-backed storage for markers and marker classes.
//!
//! Classes and markers live in two JSON arrays, `classes.json` and
//! `markers.json`, inside one data directory. Mutations happen in memory;
//! call [`MapStore::save`] to persist them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use super::model::{Marker, MarkerClass, MarkerUpdate, NewMarker};
use crate::mapping::{CoordinateMapper, GpsResult, PixelResult};

pub const CLASSES_FILE: &str = "classes.json";
pub const MARKERS_FILE: &str = "markers.json";

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Class not found: {0}")]
    ClassNotFound(String),
    #[error("Marker not found: {0}")]
    MarkerNotFound(String),
    #[error("Class {id} is still used by {markers} marker(s)")]
    ClassInUse { id: String, markers: usize },
    #[error("A class named '{0}' already exists")]
    DuplicateClass(String),
    #[error("Name must not be empty")]
    EmptyName,
    #[error("Coordinate is not finite: lat={lat}, lng={lng}")]
    InvalidCoordinate { lat: f64, lng: f64 },
}

/// A marker together with where it lands on the floor plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Pin<'a> {
    pub marker: &'a Marker,
    pub placement: PixelResult,
}

/// Markers and classes backed by a data directory.
#[derive(Debug, Clone)]
pub struct MapStore {
    dir: PathBuf,
    classes: Vec<MarkerClass>,
    markers: Vec<Marker>,
}

impl MapStore {
    /// Create an empty store rooted at `dir` without touching the disk.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            classes: Vec::new(),
            markers: Vec::new(),
        }
    }

    /// Load classes and markers from `dir`. Missing files load as empty.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        let classes = read_json(&dir.join(CLASSES_FILE))?;
        let markers = read_json(&dir.join(MARKERS_FILE))?;

        let store = Self {
            dir,
            classes,
            markers,
        };
        info!(
            dir = %store.dir.display(),
            classes = store.classes.len(),
            markers = store.markers.len(),
            "loaded map store"
        );
        Ok(store)
    }

    /// Write both files, creating the data directory if needed.
    pub fn save(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        write_json(&self.dir.join(CLASSES_FILE), &self.classes)?;
        write_json(&self.dir.join(MARKERS_FILE), &self.markers)?;

        info!(
            dir = %self.dir.display(),
            classes = self.classes.len(),
            markers = self.markers.len(),
            "saved map store"
        );
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // Classes

    pub fn classes(&self) -> &[MarkerClass] {
        &self.classes
    }

    pub fn class(&self, id: &str) -> Option<&MarkerClass> {
        self.classes.iter().find(|c| c.id == id)
    }

    /// Add a class. Names are trimmed and must be unique ignoring case.
    pub fn add_class(
        &mut self,
        name: &str,
        color: Option<String>,
    ) -> Result<&MarkerClass, StoreError> {
        let name = self.check_class_name(name, None)?;
        let class = MarkerClass::new(name, color);
        info!(id = %class.id, name = %class.name, "added class");

        self.classes.push(class);
        let last = self.classes.len() - 1;
        Ok(&self.classes[last])
    }

    /// Rename and/or recolor a class.
    pub fn update_class(
        &mut self,
        id: &str,
        name: Option<&str>,
        color: Option<String>,
    ) -> Result<&MarkerClass, StoreError> {
        let index = self
            .classes
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::ClassNotFound(id.to_string()))?;

        let name = match name {
            Some(name) => Some(self.check_class_name(name, Some(id))?),
            None => None,
        };

        let class = &mut self.classes[index];
        if let Some(name) = name {
            class.name = name;
        }
        if color.is_some() {
            class.color = color;
        }
        info!(id, name = %class.name, "updated class");
        Ok(&*class)
    }

    /// Remove a class. Refused while any marker still belongs to it.
    pub fn remove_class(&mut self, id: &str) -> Result<MarkerClass, StoreError> {
        let index = self
            .classes
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| StoreError::ClassNotFound(id.to_string()))?;

        let in_use = self.markers.iter().filter(|m| m.class_id == id).count();
        if in_use > 0 {
            return Err(StoreError::ClassInUse {
                id: id.to_string(),
                markers: in_use,
            });
        }

        info!(id, "removed class");
        Ok(self.classes.remove(index))
    }

    fn check_class_name(&self, name: &str, except_id: Option<&str>) -> Result<String, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        let folded = name.to_lowercase();
        let taken = self
            .classes
            .iter()
            .any(|c| Some(c.id.as_str()) != except_id && c.name.to_lowercase() == folded);
        if taken {
            return Err(StoreError::DuplicateClass(name.to_string()));
        }
        Ok(name.to_string())
    }

    // Markers

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn marker(&self, id: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    pub fn markers_in_class<'a>(&'a self, class_id: &'a str) -> impl Iterator<Item = &'a Marker> {
        self.markers.iter().filter(move |m| m.class_id == class_id)
    }

    /// Add a marker. Its class must exist and its name must not be blank.
    pub fn add_marker(&mut self, mut input: NewMarker) -> Result<&Marker, StoreError> {
        input.name = input.name.trim().to_string();
        if input.name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        require_finite(input.lat, input.lng)?;
        self.require_class(&input.class_id)?;

        let marker = Marker::new(input);
        info!(
            id = %marker.id,
            name = %marker.name,
            lat = marker.lat,
            lng = marker.lng,
            "added marker"
        );

        self.markers.push(marker);
        let last = self.markers.len() - 1;
        Ok(&self.markers[last])
    }

    /// Edit a marker in place.
    pub fn update_marker(
        &mut self,
        id: &str,
        mut update: MarkerUpdate,
    ) -> Result<&Marker, StoreError> {
        let index = self
            .markers
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| StoreError::MarkerNotFound(id.to_string()))?;

        if let Some(name) = update.name.as_mut() {
            *name = name.trim().to_string();
            if name.is_empty() {
                return Err(StoreError::EmptyName);
            }
        }
        if let Some(class_id) = update.class_id.as_deref() {
            self.require_class(class_id)?;
        }
        let current = &self.markers[index];
        require_finite(
            update.lat.unwrap_or(current.lat),
            update.lng.unwrap_or(current.lng),
        )?;

        let marker = &mut self.markers[index];
        marker.apply(update);
        info!(id, name = %marker.name, "updated marker");
        Ok(&*marker)
    }

    pub fn remove_marker(&mut self, id: &str) -> Result<Marker, StoreError> {
        let index = self
            .markers
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| StoreError::MarkerNotFound(id.to_string()))?;

        info!(id, "removed marker");
        Ok(self.markers.remove(index))
    }

    /// Create a marker from a position clicked on the floor plan.
    pub fn place_marker_at_pixel(
        &mut self,
        mapper: &CoordinateMapper,
        pixel_x: f64,
        pixel_y: f64,
        name: &str,
        class_id: &str,
        description: &str,
    ) -> Result<&Marker, StoreError> {
        let GpsResult { lat, lng, .. } = mapper.pixel_to_gps(pixel_x, pixel_y);
        self.add_marker(NewMarker::new(name, class_id, lat, lng).with_description(description))
    }

    /// Every marker with its floor-plan placement.
    pub fn pins<'a>(&'a self, mapper: &CoordinateMapper) -> Vec<Pin<'a>> {
        self.markers
            .iter()
            .map(|marker| {
                let placement = mapper.gps_to_pixel(marker.lat, marker.lng);
                if !placement.is_valid {
                    warn!(
                        id = %marker.id,
                        name = %marker.name,
                        pixel_x = placement.pixel_x,
                        pixel_y = placement.pixel_y,
                        "marker lies outside the map and was clamped"
                    );
                }
                Pin { marker, placement }
            })
            .collect()
    }

    fn require_class(&self, class_id: &str) -> Result<(), StoreError> {
        if self.class(class_id).is_none() {
            return Err(StoreError::ClassNotFound(class_id.to_string()));
        }
        Ok(())
    }
}

/// JSON has no representation for NaN or infinity; such markers could be
/// saved but never loaded again.
fn require_finite(lat: f64, lng: f64) -> Result<(), StoreError> {
    if lat.is_finite() && lng.is_finite() {
        Ok(())
    } else {
        Err(StoreError::InvalidCoordinate { lat, lng })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, items: &[T]) -> Result<(), StoreError> {
    let content = serde_json::to_string_pretty(items)?;
    fs::write(path, content).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
