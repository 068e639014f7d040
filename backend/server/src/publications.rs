//! # Publication Resolver
//!
//! Joins public listings onto the surviving corner set and projects them into
//! map pins. Listings carry no coordinates of their own: each pin inherits
//! its parent corner's display coordinate, so approximate corners never leak
//! a true position through their listings either.
use std::collections::HashMap;

use crate::{
    corners::{ProjectedCorner, contains_ci, has_theme_overlap},
    geo::haversine_distance_km,
    models::{Coordinate, ListingKind, Publication, PublicationPin, PublicationType},
    storage::{CornerStore, StorageError},
};

/// Fetches and projects the publication layer for the surviving corners.
/// Short-circuits on an empty corner set to avoid a storage call with an
/// empty id list.
pub async fn resolve_publications<S>(
    store: &S,
    survivors: &[ProjectedCorner],
    center: Coordinate,
    search: &str,
    themes: &[String],
    max_distance_km: Option<f64>,
) -> Result<Vec<PublicationPin>, StorageError>
where
    S: CornerStore + ?Sized,
{
    if survivors.is_empty() {
        return Ok(Vec::new());
    }

    let corner_ids: Vec<String> = survivors
        .iter()
        .map(|projected| projected.corner.id.clone())
        .collect();
    let listings = store.public_listings_for_corners(&corner_ids).await?;

    let lookup: HashMap<&str, &ProjectedCorner> = survivors
        .iter()
        .map(|projected| (projected.corner.id.as_str(), projected))
        .collect();

    Ok(build_publication_pins(
        listings,
        &lookup,
        center,
        search,
        themes,
        max_distance_km,
    ))
}

/// Pure join/filter/projection step, separated from the storage fetch.
pub fn build_publication_pins(
    listings: Vec<Publication>,
    lookup: &HashMap<&str, &ProjectedCorner>,
    center: Coordinate,
    search: &str,
    themes: &[String],
    max_distance_km: Option<f64>,
) -> Vec<PublicationPin> {
    listings
        .into_iter()
        .filter_map(|listing| build_pin(listing, lookup, center, search, themes, max_distance_km))
        .collect()
}

fn build_pin(
    listing: Publication,
    lookup: &HashMap<&str, &ProjectedCorner>,
    center: Coordinate,
    search: &str,
    themes: &[String],
    max_distance_km: Option<f64>,
) -> Option<PublicationPin> {
    // storage may return stale joins; anything not in the surviving set drops
    let corner_id = listing.corner_id.as_deref()?;
    let projected = lookup.get(corner_id)?;

    if !search.is_empty()
        && !listing_matches_search(&listing, search)
        && !projected.matches_search(search)
    {
        return None;
    }
    if !themes.is_empty() && !has_theme_overlap(&projected.synthesized_themes(), themes) {
        return None;
    }

    let distance_km = haversine_distance_km(center, projected.display.coordinate);
    if max_distance_km.is_some_and(|max| distance_km > max) {
        return None;
    }

    let kind = classify(&listing);
    let photo = listing
        .photo_url
        .or_else(|| projected.corner.photo_url.clone());

    Some(PublicationPin {
        id: listing.id,
        title: listing.title,
        authors: listing.author.into_iter().collect(),
        kind,
        photo,
        distance_km,
        corner_id: projected.corner.id.clone(),
        lat: projected.display.coordinate.latitude,
        lon: projected.display.coordinate.longitude,
    })
}

/// Fixed precedence: the sale flag wins over donation, donation over the
/// listing's own `want` type, everything else is an offer.
pub fn classify(listing: &Publication) -> PublicationType {
    if listing.sale {
        PublicationType::Sale
    } else if listing.donation {
        PublicationType::Donation
    } else if listing.kind == ListingKind::Want {
        PublicationType::Want
    } else {
        PublicationType::Offer
    }
}

fn listing_matches_search(listing: &Publication, term: &str) -> bool {
    contains_ci(&listing.title, term)
        || listing
            .author
            .as_deref()
            .is_some_and(|author| contains_ci(author, term))
}
