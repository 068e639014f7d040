use std::{collections::HashSet, sync::Arc};

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    community::{self, CornerSummary, MiniMap},
    error::AppError,
    geocode::{self, GeocodingSuggestion},
    map::map_data,
    models::{BoundingBox, MapFilters, MapLayer, MapQuery, MapResponse},
    state::AppState,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapParams {
    north: Option<f64>,
    south: Option<f64>,
    east: Option<f64>,
    west: Option<f64>,
    search: Option<String>,
    layers: Option<String>,
    themes: Option<String>,
    distance_km: Option<f64>,
    open_now: Option<String>,
    recent_activity: Option<String>,
}

pub async fn map_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MapParams>,
) -> Result<Json<MapResponse>, AppError> {
    let (Some(north), Some(south), Some(east), Some(west)) =
        (params.north, params.south, params.east, params.west)
    else {
        return Err(AppError::BoundingBoxRequired);
    };

    // east < west is a legal antimeridian crossing; an inverted latitude
    // range never is
    if north < south {
        return Err(AppError::BoundingBoxRequired);
    }

    let query = MapQuery {
        bbox: BoundingBox {
            north,
            south,
            east,
            west,
        },
        search: params.search.unwrap_or_default(),
        filters: MapFilters {
            max_distance_km: params
                .distance_km
                .filter(|km| km.is_finite() && *km > 0.0),
            themes: parse_list(params.themes.as_deref()),
            open_now: parse_bool(params.open_now.as_deref(), false),
            recent_activity: parse_bool(params.recent_activity.as_deref(), true),
        },
        layers: parse_layers(params.layers.as_deref()),
    };

    let response = map_data(state.store.as_ref(), &query).await?;
    Ok(Json(response))
}

#[derive(Deserialize)]
pub struct GeocodeParams {
    q: Option<String>,
    locale: Option<String>,
}

pub async fn geocode_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GeocodeParams>,
) -> Result<Json<Vec<GeocodingSuggestion>>, AppError> {
    let query = params.q.as_deref().map(str::trim).unwrap_or_default();
    if query.is_empty() {
        return Err(AppError::GeocodingQueryRequired);
    }

    let suggestions =
        geocode::fetch_suggestions(&state.http, &state.config, query, params.locale.as_deref())
            .await?;
    Ok(Json(suggestions))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyParams {
    latitude: Option<f64>,
    longitude: Option<f64>,
    radius_km: Option<f64>,
    limit: Option<usize>,
}

pub async fn nearby_corners_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<Vec<CornerSummary>>, AppError> {
    let summaries = community::nearby_corners(
        state.store.as_ref(),
        params.latitude,
        params.longitude,
        params.radius_km,
        params.limit,
    )
    .await?;

    Ok(Json(summaries))
}

pub async fn corners_map_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MiniMap>, AppError> {
    Ok(Json(community::corner_mini_map(state.store.as_ref()).await?))
}

fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value {
        None => default,
        Some(raw) => {
            let normalized = raw.trim().to_lowercase();
            normalized == "1" || normalized == "true"
        }
    }
}

fn parse_list(value: Option<&str>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// Unknown layer names are ignored; an empty selection means all layers.
fn parse_layers(value: Option<&str>) -> HashSet<MapLayer> {
    let requested: HashSet<MapLayer> = parse_list(value)
        .iter()
        .filter_map(|entry| MapLayer::parse(entry))
        .collect();

    if requested.is_empty() {
        HashSet::from(MapLayer::ALL)
    } else {
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool(Some("true"), false));
        assert!(parse_bool(Some("1"), false));
        assert!(parse_bool(Some(" TRUE "), false));
        assert!(!parse_bool(Some("0"), true));
        assert!(!parse_bool(Some("no"), true));
        assert!(parse_bool(None, true));
        assert!(!parse_bool(None, false));
    }

    #[test]
    fn test_parse_list_drops_empty_entries() {
        assert_eq!(
            parse_list(Some("historia, poesía ,,  ")),
            vec!["historia".to_string(), "poesía".to_string()]
        );
        assert!(parse_list(Some("")).is_empty());
        assert!(parse_list(None).is_empty());
    }

    #[test]
    fn test_parse_layers_defaults_to_all() {
        assert_eq!(parse_layers(None), HashSet::from(MapLayer::ALL));
        assert_eq!(parse_layers(Some("")), HashSet::from(MapLayer::ALL));
        assert_eq!(parse_layers(Some("heatmap")), HashSet::from(MapLayer::ALL));
    }

    #[test]
    fn test_parse_layers_keeps_known_names() {
        let layers = parse_layers(Some("corners,publications,heatmap"));

        assert_eq!(
            layers,
            HashSet::from([MapLayer::Corners, MapLayer::Publications])
        );
    }
}
