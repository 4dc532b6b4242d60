//! Cached website-performance analysis.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct WebsiteAnalysisBody {
    pub url: Option<String>,
    #[serde(default)]
    pub skip_cache: bool,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct WebsiteAnalysisData {
    pub url: String,
    pub accessible: bool,
    pub has_ssl: bool,
    pub speed_score: Option<u8>,
    pub seo_score: Option<u8>,
    pub accessibility_score: Option<u8>,
    pub best_practices_score: Option<u8>,
    pub cached: bool,
}

pub(in crate::api) async fn analyze_website(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<WebsiteAnalysisBody>,
) -> Result<Json<ApiResponse<WebsiteAnalysisData>>, ApiError> {
    let Some(url) = body.url.filter(|u| !u.trim().is_empty()) else {
        return Err(ApiError::new(req_id.0, "validation_error", "url is required"));
    };

    let result = vizaudit_webcheck::get_or_compute(
        &state.pool,
        &url,
        body.skip_cache,
        state.config.cache_freshness_days,
        state.checker.as_ref(),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: WebsiteAnalysisData {
            url: result.url,
            accessible: result.profile.accessible,
            has_ssl: result.profile.has_ssl,
            speed_score: result.profile.speed_score,
            seo_score: result.profile.seo_score,
            accessibility_score: result.accessibility_score,
            best_practices_score: result.best_practices_score,
            cached: result.cached,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
