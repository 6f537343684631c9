//! Marker and class records as persisted on disk.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A category of points of interest (e.g. "Exit", "Extinguisher").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerClass {
    pub id: String,
    pub name: String,
    /// CSS color used by the map viewer for pins of this class.
    #[serde(default)]
    pub color: Option<String>,
    pub created_at: String,
}

impl MarkerClass {
    pub fn new(name: impl Into<String>, color: Option<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            color,
            created_at: now(),
        }
    }
}

/// A labeled point of interest, stored in geodetic coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub class_id: String,
    pub lat: f64,
    pub lng: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl Marker {
    pub fn new(input: NewMarker) -> Self {
        let timestamp = now();
        Self {
            id: new_id(),
            name: input.name,
            description: input.description,
            class_id: input.class_id,
            lat: input.lat,
            lng: input.lng,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        }
    }

    /// Apply the fields set in `update` and bump `updated_at`.
    pub fn apply(&mut self, update: MarkerUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(class_id) = update.class_id {
            self.class_id = class_id;
        }
        if let Some(lat) = update.lat {
            self.lat = lat;
        }
        if let Some(lng) = update.lng {
            self.lng = lng;
        }
        self.updated_at = now();
    }
}

/// Fields required to create a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMarker {
    pub name: String,
    pub description: String,
    pub class_id: String,
    pub lat: f64,
    pub lng: f64,
}

impl NewMarker {
    pub fn new(name: impl Into<String>, class_id: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            class_id: class_id.into(),
            lat,
            lng,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Partial marker edit; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub class_id: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_apply_partial_update() {
        let mut marker = Marker::new(NewMarker::new("Hydrant", "class-1", 1.0, 2.0));
        let created = marker.created_at.clone();

        marker.apply(MarkerUpdate {
            name: Some("Hydrant A".to_string()),
            lat: Some(3.0),
            ..Default::default()
        });

        assert_eq!(marker.name, "Hydrant A");
        assert_eq!(marker.lat, 3.0);
        assert_eq!(marker.lng, 2.0);
        assert_eq!(marker.class_id, "class-1");
        assert_eq!(marker.created_at, created);
    }

    #[test]
    fn test_marker_json_is_camel_case() {
        let marker = Marker::new(NewMarker::new("Exit", "c", 0.0, 0.0).with_description("North"));
        let value = serde_json::to_value(&marker).unwrap();
        assert_eq!(value["classId"], serde_json::json!("c"));
        assert_eq!(value["description"], serde_json::json!("North"));
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_class_ids_are_unique() {
        let a = MarkerClass::new("Exit", None);
        let b = MarkerClass::new("Exit", None);
        assert_ne!(a.id, b.id);
    }
}
