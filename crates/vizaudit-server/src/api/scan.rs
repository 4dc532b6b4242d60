//! Directory presence scan: where is this business listed?

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use vizaudit_core::{listings_score, DirectoryProbe, DirectorySpec};
use vizaudit_places::PlacesError;
use vizaudit_social::directory_presence_digit;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// Estimated probes with no explicit threshold use this one.
const DEFAULT_FOUND_THRESHOLD: u8 = 5;

#[derive(Debug, Deserialize)]
pub(in crate::api) struct ScanBody {
    pub place_id: String,
    pub business_name: String,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct DirectoryScanItem {
    pub directory: String,
    pub status: &'static str,
    pub external_url: Option<String>,
    pub found_name: Option<String>,
    pub found_address: Option<String>,
    pub found_phone: Option<String>,
    pub found_rating: Option<f64>,
    pub found_review_count: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct ScanData {
    pub results: Vec<DirectoryScanItem>,
    pub score: u8,
}

pub(in crate::api) async fn scan_directories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ScanBody>,
) -> Result<Json<ApiResponse<ScanData>>, ApiError> {
    if body.place_id.trim().is_empty() || body.business_name.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "place_id and business_name are required",
        ));
    }

    let mut results = Vec::with_capacity(state.directories.len());
    for spec in state.directories.iter() {
        let item = match spec.probe {
            DirectoryProbe::Places => scan_via_places(&state, spec, &body.place_id).await,
            DirectoryProbe::Estimated => scan_estimated(spec, &body.business_name),
        };
        results.push(item);
    }

    let found = results.iter().filter(|r| r.status == "found").count();
    let score = listings_score(found, results.len());

    Ok(Json(ApiResponse {
        data: ScanData { results, score },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Look the business up through the places provider.
///
/// A missing provider or a failed lookup is an `error` entry, not a request
/// failure — one broken directory must not sink the whole scan.
async fn scan_via_places(
    state: &AppState,
    spec: &DirectorySpec,
    place_id: &str,
) -> DirectoryScanItem {
    let Some(places) = state.places.as_ref() else {
        return scan_item(spec, "error");
    };

    match places.place_details(place_id).await {
        Ok(details) => DirectoryScanItem {
            directory: spec.name.clone(),
            status: "found",
            external_url: details.maps_url,
            found_name: Some(details.name),
            found_address: Some(details.address),
            found_phone: details.phone,
            found_rating: details.rating,
            found_review_count: Some(details.review_count),
        },
        Err(PlacesError::NotFound { .. }) => scan_item(spec, "not_found"),
        Err(e) => {
            tracing::warn!(error = %e, directory = %spec.name, "directory lookup failed");
            scan_item(spec, "error")
        }
    }
}

fn scan_estimated(spec: &DirectorySpec, business_name: &str) -> DirectoryScanItem {
    let threshold = spec.found_threshold.unwrap_or(DEFAULT_FOUND_THRESHOLD);
    let digit = directory_presence_digit(business_name, &spec.name);
    let status = if digit > threshold { "found" } else { "not_found" };

    let mut item = scan_item(spec, status);
    if status == "found" {
        item.found_name = Some(business_name.to_owned());
    }
    item
}

fn scan_item(spec: &DirectorySpec, status: &'static str) -> DirectoryScanItem {
    DirectoryScanItem {
        directory: spec.name.clone(),
        status,
        external_url: None,
        found_name: None,
        found_address: None,
        found_phone: None,
        found_rating: None,
        found_review_count: None,
    }
}
