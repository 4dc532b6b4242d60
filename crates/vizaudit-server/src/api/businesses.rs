//! Business resolution: search candidates and fetch place details.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use vizaudit_places::{PlaceDetails, PlacesError};

use crate::middleware::RequestId;

use super::{require_places, ApiError, ApiResponse, AppState, ResponseMeta};

const MAX_SEARCH_RESULTS: usize = 5;

#[derive(Debug, Deserialize)]
pub(in crate::api) struct SearchQuery {
    pub query: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct BusinessSearchItem {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub rating: Option<f64>,
    pub review_count: u32,
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct SearchData {
    pub results: Vec<BusinessSearchItem>,
}

pub(in crate::api) async fn search_businesses(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchData>>, ApiError> {
    let places = require_places(&state, &req_id.0)?;

    let term = query.query.unwrap_or_default();
    if term.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "query is required",
        ));
    }

    let search_query = match query.location {
        Some(location) if !location.trim().is_empty() => format!("{term} {location}"),
        _ => term,
    };

    let summaries = places
        .text_search(&search_query, None, None)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    let results = summaries
        .into_iter()
        .take(MAX_SEARCH_RESULTS)
        .map(|s| BusinessSearchItem {
            place_id: s.place_id,
            name: s.name,
            address: s.address,
            rating: s.rating,
            review_count: s.review_count,
            category: s.category,
        })
        .collect();

    Ok(Json(ApiResponse {
        data: SearchData { results },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct BusinessData {
    pub business: PlaceDetails,
}

pub(in crate::api) async fn get_business(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(place_id): Path<String>,
) -> Result<Json<ApiResponse<BusinessData>>, ApiError> {
    let places = require_places(&state, &req_id.0)?;

    let details = places
        .place_details(&place_id)
        .await
        .map_err(|e| map_places_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: BusinessData { business: details },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(in crate::api) fn map_places_error(request_id: String, error: &PlacesError) -> ApiError {
    match error {
        PlacesError::NotFound { .. } => {
            ApiError::new(request_id, "not_found", "place not found")
        }
        other => {
            tracing::error!(error = %other, "places provider request failed");
            ApiError::new(request_id, "unavailable", "places provider request failed")
        }
    }
}
