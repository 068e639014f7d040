//! # Map Query Orchestrator
//!
//! One query in, one response out:
//!
//! 1. Normalize the search term and theme filters.
//! 2. Expand the viewport by the fetch padding so corners whose jittered
//!    position could land inside the viewport are not missed at fetch time.
//! 3. Fetch candidates (a single storage call, the only hard failure point).
//! 4. Project corners; survival here gates the other two layers.
//! 5. Assemble the requested layers; publications and activity have no data
//!    dependency on each other once projection is done.
//!
//! The engine is stateless per invocation. With an unchanged snapshot the
//! same query returns byte-identical layers (the jitter is deterministic and
//! ordering follows storage order); only `meta.generatedAt` moves.
use chrono::Utc;
use tracing::debug;

use crate::{
    activity::build_activity_points,
    corners::{ProjectedCorner, project_corners},
    geo::expand_bounding_box,
    models::{MapLayer, MapQuery, MapResponse, MapResponseMeta},
    publications::resolve_publications,
    storage::{CornerStore, StorageError},
};

/// Margin added to the requested viewport before querying storage, wide
/// enough to cover the obfuscation radius with room to spare.
pub const FETCH_PADDING_METERS: f64 = 1500.0;

pub async fn map_data<S>(store: &S, query: &MapQuery) -> Result<MapResponse, StorageError>
where
    S: CornerStore + ?Sized,
{
    let search = query.search.trim().to_lowercase();
    let themes: Vec<String> = query
        .filters
        .themes
        .iter()
        .map(|theme| theme.trim().to_lowercase())
        .filter(|theme| !theme.is_empty())
        .collect();

    let window = expand_bounding_box(query.bbox, FETCH_PADDING_METERS);
    let candidates = store.corners_within(&window).await?;

    let candidate_count = candidates.len();
    let survivors = project_corners(
        candidates,
        &query.bbox,
        &search,
        &themes,
        query.filters.open_now,
    );
    debug!(
        "{} of {candidate_count} candidate corners survive filtering",
        survivors.len()
    );

    // distances are measured from the unpadded viewport's midpoint
    let center = query.bbox.center();

    let want_publications = query.layers.contains(&MapLayer::Publications);
    let want_activity =
        query.layers.contains(&MapLayer::Activity) && query.filters.recent_activity;

    let (publications, activity) = tokio::join!(
        async {
            if want_publications {
                resolve_publications(
                    store,
                    &survivors,
                    center,
                    &search,
                    &themes,
                    query.filters.max_distance_km,
                )
                .await
            } else {
                Ok(Vec::new())
            }
        },
        async {
            if want_activity {
                build_activity_points(&survivors)
            } else {
                Vec::new()
            }
        }
    );
    let publications = publications?;

    let corners = if query.layers.contains(&MapLayer::Corners) {
        survivors.iter().map(ProjectedCorner::pin).collect()
    } else {
        Vec::new()
    };

    Ok(MapResponse {
        corners,
        publications,
        activity,
        meta: MapResponseMeta {
            bbox: query.bbox,
            generated_at: Utc::now(),
        },
    })
}
