//! # Domain Model
//!
//! Read-only projections of the catalog entities plus the wire shapes the map
//! endpoint returns.
//!
//! Two families live here:
//! - **Records** ([`Corner`], [`Publication`]): what storage hands the engine.
//!   Anything that can be absent in the database (geometry, metrics, photos,
//!   address parts) is an `Option` so the fallback chains stay exhaustive.
//! - **Pins** ([`CornerPin`], [`PublicationPin`], [`ActivityPoint`]): what the
//!   frontend map consumes. Field names serialize in camelCase to match the
//!   existing JSON contract.
//!
//! Nothing here outlives a single query/response cycle.
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Viewport in WGS84 degrees. `north >= south` always holds on input;
/// `east < west` is a valid box crossing the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl BoundingBox {
    /// Midpoint of the box corners, used as the distance origin for
    /// publication pins.
    pub fn center(&self) -> Coordinate {
        Coordinate {
            latitude: (self.north + self.south) / 2.0,
            longitude: (self.east + self.west) / 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Exact,
    Approximate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CornerStatus {
    Active,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CornerScope {
    Public,
    Semiprivate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CornerAddress {
    pub street: Option<String>,
    pub number: Option<String>,
    pub unit: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CornerMetrics {
    pub total_exchanges: u32,
    pub weekly_exchanges: u32,
    pub last_activity_at: Option<DateTime<Utc>>,
}

/// A community book corner as storage projects it for the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Corner {
    pub id: String,
    pub name: String,
    pub scope: CornerScope,
    pub status: CornerStatus,
    pub draft: bool,
    pub visibility: Visibility,
    /// True geographic position. Corners without geometry never reach a pin.
    pub coordinate: Option<Coordinate>,
    pub barrio: Option<String>,
    pub city: Option<String>,
    pub address: CornerAddress,
    pub rules: Option<String>,
    pub themes: Vec<String>,
    pub photo_url: Option<String>,
    pub metrics: Option<CornerMetrics>,
}

impl Corner {
    /// Human-readable address summary. For approximate corners this is what
    /// the UI shows as the reference point instead of a street number.
    pub fn location_summary(&self) -> String {
        let street = self.address.street.as_deref().unwrap_or("");

        match self.visibility {
            Visibility::Approximate => match self.address.postal_code.as_deref() {
                Some(postal_code) => format!("{street} · CP {postal_code}"),
                None => format!("{street} · Zona aproximada"),
            },
            Visibility::Exact => {
                let number = self.address.number.as_deref().unwrap_or("");
                let unit = self
                    .address
                    .unit
                    .as_deref()
                    .map(|unit| format!(" {unit}"))
                    .unwrap_or_default();

                format!("{street} {number}{unit}").trim().to_string()
            }
        }
    }
}

/// Base listing intent declared by the publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingKind {
    Offer,
    Want,
}

/// A public, non-draft book listing as storage projects it for the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Publication {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub kind: ListingKind,
    pub sale: bool,
    pub donation: bool,
    /// Listings without a corner never reach the map.
    pub corner_id: Option<String>,
    pub photo_url: Option<String>,
}

/// Transaction classification shown in the map legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationType {
    Sale,
    Donation,
    Want,
    Offer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerPin {
    pub id: String,
    pub name: String,
    pub barrio: String,
    pub city: String,
    pub lat: f64,
    pub lon: f64,
    pub last_signal_at: Option<DateTime<Utc>>,
    pub photos: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_point_label: Option<String>,
    pub themes: Vec<String>,
    pub is_open_now: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationPin {
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    #[serde(rename = "type")]
    pub kind: PublicationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub distance_km: f64,
    pub corner_id: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPoint {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub intensity: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapResponseMeta {
    pub bbox: BoundingBox,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapResponse {
    pub corners: Vec<CornerPin>,
    pub publications: Vec<PublicationPin>,
    pub activity: Vec<ActivityPoint>,
    pub meta: MapResponseMeta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapLayer {
    Corners,
    Publications,
    Activity,
}

impl MapLayer {
    pub const ALL: [MapLayer; 3] = [MapLayer::Corners, MapLayer::Publications, MapLayer::Activity];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "corners" => Some(MapLayer::Corners),
            "publications" => Some(MapLayer::Publications),
            "activity" => Some(MapLayer::Activity),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MapFilters {
    /// Maximum distance from the viewport center for publication pins.
    pub max_distance_km: Option<f64>,
    pub themes: Vec<String>,
    pub open_now: bool,
    pub recent_activity: bool,
}

#[derive(Debug, Clone)]
pub struct MapQuery {
    pub bbox: BoundingBox,
    pub search: String,
    pub filters: MapFilters,
    pub layers: HashSet<MapLayer>,
}
