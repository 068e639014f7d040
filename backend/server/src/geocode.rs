//! # Geocoding
//!
//! Thin proxy over a Nominatim-style provider for the map search box. The
//! provider response is reshaped into address suggestions the corner
//! publishing flow can prefill; entries with unusable coordinates are
//! skipped rather than failing the whole lookup.
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{config::Config, models::Coordinate};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodingSuggestion {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_label: Option<String>,
    pub street: String,
    pub number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    pub coordinates: Coordinate,
}

#[derive(Debug, Deserialize)]
struct NominatimResult {
    place_id: u64,
    display_name: String,
    lat: String,
    lon: String,
    address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    house_number: Option<String>,
    road: Option<String>,
    pedestrian: Option<String>,
    neighbourhood: Option<String>,
    suburb: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
    region: Option<String>,
    postcode: Option<String>,
    country: Option<String>,
}

pub async fn fetch_suggestions(
    client: &Client,
    config: &Config,
    query: &str,
    locale: Option<&str>,
) -> Result<Vec<GeocodingSuggestion>, reqwest::Error> {
    let mut request = client
        .get(config.geocoding_base_url.as_str())
        .header(reqwest::header::USER_AGENT, &config.geocoding_user_agent)
        .query(&[
            ("q", query),
            ("format", "jsonv2"),
            ("addressdetails", "1"),
            ("limit", "5"),
        ]);

    if let Some(locale) = locale.map(str::trim).filter(|locale| !locale.is_empty()) {
        request = request.query(&[("accept-language", locale)]);
    }

    let results: Vec<NominatimResult> = request
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(results
        .into_iter()
        .filter_map(suggestion_from_result)
        .collect())
}

fn suggestion_from_result(result: NominatimResult) -> Option<GeocodingSuggestion> {
    let latitude: f64 = result.lat.parse().ok()?;
    let longitude: f64 = result.lon.parse().ok()?;

    let address = result.address.unwrap_or_default();
    let street = pick_street(&address, &result.display_name);
    let number = pick_number(&address);

    Some(GeocodingSuggestion {
        id: format!("nominatim-{}", result.place_id),
        label: format!("{street} {number}").trim().to_string(),
        secondary_label: secondary_label(&address),
        street,
        number,
        postal_code: address.postcode,
        coordinates: Coordinate::new(latitude, longitude),
    })
}

/// road → pedestrian → neighbourhood → suburb → first display-name segment.
fn pick_street(address: &NominatimAddress, display_name: &str) -> String {
    address
        .road
        .as_deref()
        .or(address.pedestrian.as_deref())
        .or(address.neighbourhood.as_deref())
        .or(address.suburb.as_deref())
        .filter(|candidate| !candidate.is_empty())
        .unwrap_or_else(|| display_name.split(',').next().unwrap_or(display_name))
        .to_string()
}

fn pick_number(address: &NominatimAddress) -> String {
    address
        .house_number
        .as_deref()
        .map(str::trim)
        .filter(|number| !number.is_empty())
        .unwrap_or("s/n")
        .to_string()
}

fn secondary_label(address: &NominatimAddress) -> Option<String> {
    let locality = address
        .city
        .as_deref()
        .or(address.town.as_deref())
        .or(address.village.as_deref())
        .or(address.suburb.as_deref());
    let region = address.state.as_deref().or(address.region.as_deref());
    let country = address.country.as_deref();

    let parts: Vec<&str> = [locality, region, country]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}
