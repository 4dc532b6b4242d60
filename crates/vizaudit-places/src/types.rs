use serde::{Deserialize, Serialize};
use vizaudit_core::PlacesProfile;

/// One candidate business from a text search.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceSummary {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub rating: Option<f64>,
    pub review_count: u32,
    pub category: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Full details for a resolved place.
#[derive(Debug, Clone, Serialize)]
pub struct PlaceDetails {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub review_count: u32,
    pub photos_count: u32,
    pub price_level: Option<i32>,
    pub business_status: Option<String>,
    pub types: Vec<String>,
    pub opening_hours: Option<Vec<String>>,
    pub maps_url: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl PlaceDetails {
    /// The scorer-facing slice of these details.
    #[must_use]
    pub fn places_profile(&self) -> PlacesProfile {
        PlacesProfile {
            rating: self.rating,
            review_count: self.review_count,
            photos_count: self.photos_count,
            has_website: self.website.is_some(),
        }
    }
}

// ---------------------------------------------------------------------------
// Wire shapes — the provider's JSON envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub status: String,
    pub error_message: Option<String>,
    #[serde(default)]
    pub results: Vec<RawPlace>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DetailsResponse {
    pub status: String,
    pub error_message: Option<String>,
    pub result: Option<RawPlaceDetails>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPlace {
    pub place_id: String,
    pub name: String,
    pub formatted_address: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub types: Vec<String>,
    pub geometry: Option<RawGeometry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPlaceDetails {
    pub place_id: Option<String>,
    pub name: String,
    pub formatted_address: Option<String>,
    pub formatted_phone_number: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    #[serde(default)]
    pub photos: Vec<serde_json::Value>,
    pub price_level: Option<i32>,
    pub business_status: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    pub opening_hours: Option<RawOpeningHours>,
    pub url: Option<String>,
    pub geometry: Option<RawGeometry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawOpeningHours {
    pub weekday_text: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawGeometry {
    pub location: Option<RawLocation>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLocation {
    pub lat: f64,
    pub lng: f64,
}

impl RawPlace {
    /// First type tag with underscores humanized, e.g. `"hair_salon"` → `"hair salon"`.
    fn category(&self) -> Option<String> {
        self.types.first().map(|t| t.replace('_', " "))
    }

    pub(crate) fn into_summary(self) -> PlaceSummary {
        let category = self.category();
        let (latitude, longitude) = self
            .geometry
            .and_then(|g| g.location)
            .map_or((None, None), |l| (Some(l.lat), Some(l.lng)));
        PlaceSummary {
            place_id: self.place_id,
            name: self.name,
            address: self.formatted_address.unwrap_or_default(),
            rating: self.rating,
            review_count: self.user_ratings_total.unwrap_or(0),
            category,
            latitude,
            longitude,
        }
    }
}

impl RawPlaceDetails {
    pub(crate) fn into_details(self, requested_place_id: &str) -> PlaceDetails {
        #[allow(clippy::cast_possible_truncation)]
        let photos_count = self.photos.len() as u32;
        let (latitude, longitude) = self
            .geometry
            .and_then(|g| g.location)
            .map_or((None, None), |l| (Some(l.lat), Some(l.lng)));
        PlaceDetails {
            place_id: self
                .place_id
                .unwrap_or_else(|| requested_place_id.to_owned()),
            name: self.name,
            address: self.formatted_address.unwrap_or_default(),
            phone: self.formatted_phone_number,
            website: self.website,
            rating: self.rating,
            review_count: self.user_ratings_total.unwrap_or(0),
            photos_count,
            price_level: self.price_level,
            business_status: self.business_status,
            types: self.types,
            opening_hours: self.opening_hours.and_then(|h| h.weekday_text),
            maps_url: self.url,
            latitude,
            longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_convert_to_places_profile() {
        let details = PlaceDetails {
            place_id: "p1".to_string(),
            name: "Harbour Bakery".to_string(),
            address: "1 Quay St".to_string(),
            phone: None,
            website: Some("https://harbourbakery.example".to_string()),
            rating: Some(4.5),
            review_count: 120,
            photos_count: 25,
            price_level: None,
            business_status: Some("OPERATIONAL".to_string()),
            types: vec!["bakery".to_string()],
            opening_hours: None,
            maps_url: None,
            latitude: None,
            longitude: None,
        };

        let profile = details.places_profile();
        assert_eq!(profile.rating, Some(4.5));
        assert_eq!(profile.review_count, 120);
        assert_eq!(profile.photos_count, 25);
        assert!(profile.has_website);
    }

    #[test]
    fn raw_place_humanizes_the_category() {
        let raw: RawPlace = serde_json::from_value(serde_json::json!({
            "place_id": "p2",
            "name": "Cut Above",
            "types": ["hair_salon", "point_of_interest"]
        }))
        .expect("deserialize");
        let summary = raw.into_summary();
        assert_eq!(summary.category.as_deref(), Some("hair salon"));
        assert_eq!(summary.review_count, 0);
    }
}
