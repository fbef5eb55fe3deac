use chrono::{DateTime, Utc};
use earthwork_core::{ElevationGrid, GridStats};
use serde::{Deserialize, Serialize};

// Lat/lon box of a site, in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    pub dem_count: u32,
    pub image_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemKind {
    Existing, // surveyed / generated ground
    Design,   // proposed finished grade
}

// A stored elevation model. `elevation_data` is the only field analyses read;
// resolution and bounds are metadata for viewers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemRecord {
    pub id: String,
    pub project_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DemKind,
    pub created_at: DateTime<Utc>,
    pub resolution: f64, // metres per pixel
    pub width: u32,
    pub height: u32,
    pub bounds: Bounds,
    pub elevation_data: ElevationGrid,
    pub stats: GridStats,
}
