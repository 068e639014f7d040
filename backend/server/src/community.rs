//! # Community Corner Views
//!
//! Two lightweight read models for the community tab: a "corners near you"
//! strip (distances from a center point, nearest first) and the mini map
//! (corner pins projected onto fixed percent bounds).
use serde::Serialize;

use crate::{
    geo::{bounding_box_around, haversine_distance_km},
    models::{BoundingBox, Corner, CornerStatus, Coordinate},
    storage::{CornerStore, StorageError},
};

pub const DEFAULT_NEARBY_CENTER: Coordinate = Coordinate {
    latitude: -34.6037,
    longitude: -58.3816,
};
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 5.0;

const DEFAULT_NEARBY_LIMIT: usize = 12;
const MAX_NEARBY_LIMIT: usize = 50;

const MINI_MAP_BOUNDS: BoundingBox = BoundingBox {
    north: -34.54,
    south: -34.72,
    east: -58.36,
    west: -58.55,
};
const MINI_MAP_DESCRIPTION: &str = "Explora los Rincones activos en tu zona.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerSummary {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub distance_km: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MiniMapPinStatus {
    Active,
    Quiet,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniMapPin {
    pub id: String,
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub status: MiniMapPinStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiniMap {
    pub pins: Vec<MiniMapPin>,
    pub description: String,
}

/// Corners around a point, nearest first. Defaults match the community tab:
/// downtown Buenos Aires, 5 km, 12 results.
pub async fn nearby_corners<S>(
    store: &S,
    latitude: Option<f64>,
    longitude: Option<f64>,
    radius_km: Option<f64>,
    limit: Option<usize>,
) -> Result<Vec<CornerSummary>, StorageError>
where
    S: CornerStore + ?Sized,
{
    let center = Coordinate {
        latitude: latitude.unwrap_or(DEFAULT_NEARBY_CENTER.latitude),
        longitude: longitude.unwrap_or(DEFAULT_NEARBY_CENTER.longitude),
    };
    let radius_km = radius_km.unwrap_or(DEFAULT_NEARBY_RADIUS_KM);
    let limit = limit
        .unwrap_or(DEFAULT_NEARBY_LIMIT)
        .clamp(1, MAX_NEARBY_LIMIT);

    let window = bounding_box_around(center, radius_km);
    let corners = store.corners_within(&window).await?;

    let mut ranked: Vec<(f64, CornerSummary)> = corners
        .into_iter()
        .filter(|corner| !corner.draft)
        .filter_map(|corner| {
            let point = corner.coordinate?;
            let distance_km = haversine_distance_km(center, point);
            if distance_km > radius_km {
                return None;
            }

            Some((distance_km, summary(corner, distance_km)))
        })
        .collect();

    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

    Ok(ranked
        .into_iter()
        .take(limit)
        .map(|(_, summary)| summary)
        .collect())
}

/// Corner pins inside the fixed community bounds, projected to percent
/// coordinates (x grows eastward, y grows southward).
pub async fn corner_mini_map<S>(store: &S) -> Result<MiniMap, StorageError>
where
    S: CornerStore + ?Sized,
{
    let corners = store.corners_within(&MINI_MAP_BOUNDS).await?;

    let pins = corners
        .iter()
        .filter(|corner| !corner.draft)
        .filter_map(|corner| {
            let point = corner.coordinate?;
            let (x, y) = project_to_bounds(point, &MINI_MAP_BOUNDS);

            Some(MiniMapPin {
                id: corner.id.clone(),
                name: corner.name.clone(),
                x,
                y,
                status: pin_status(corner),
            })
        })
        .collect();

    Ok(MiniMap {
        pins,
        description: MINI_MAP_DESCRIPTION.to_string(),
    })
}

fn summary(corner: Corner, distance_km: f64) -> CornerSummary {
    let activity_label = corner.metrics.as_ref().and_then(|metrics| {
        if metrics.weekly_exchanges > 0 {
            Some(format!(
                "{} intercambios esta semana",
                metrics.weekly_exchanges
            ))
        } else if metrics.total_exchanges > 0 {
            Some("Activo".to_string())
        } else {
            None
        }
    });

    CornerSummary {
        id: corner.id,
        name: corner.name,
        image_url: corner.photo_url.unwrap_or_default(),
        distance_km: round_to_tenth(distance_km),
        activity_label,
    }
}

fn project_to_bounds(point: Coordinate, bounds: &BoundingBox) -> (f64, f64) {
    let x_range = non_zero_range(bounds.east - bounds.west);
    let y_range = non_zero_range(bounds.north - bounds.south);

    let x = (point.longitude - bounds.west) / x_range * 100.0;
    let normalized_y = (point.latitude - bounds.south) / y_range;
    let y = (1.0 - normalized_y) * 100.0;

    (x.clamp(0.0, 100.0), y.clamp(0.0, 100.0))
}

fn non_zero_range(range: f64) -> f64 {
    if range == 0.0 { 0.000001 } else { range }
}

fn pin_status(corner: &Corner) -> MiniMapPinStatus {
    if corner.status == CornerStatus::Active && !corner.draft {
        if let Some(metrics) = &corner.metrics {
            if metrics.weekly_exchanges > 0 || metrics.last_activity_at.is_some() {
                return MiniMapPinStatus::Active;
            }
        }
    }

    MiniMapPinStatus::Quiet
}

fn round_to_tenth(km: f64) -> f64 {
    (km * 10.0).round() / 10.0
}
