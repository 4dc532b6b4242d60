//! Competitor discovery and comparative scoring for an audit.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use vizaudit_db::{BusinessRow, NewCompetitorResult};

use crate::middleware::RequestId;

use super::analyze::{run_full_analysis, AnalysisReport};
use super::businesses::map_places_error;
use super::{
    map_db_error, require_places, resolve_audit, ApiError, ApiResponse, AppState, ResponseMeta,
};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct CompetitorsBody {
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct CompetitorEntry {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub analysis: AnalysisReport,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct CompetitionData {
    pub analysis_id: i64,
    pub search_query: String,
    pub your_analysis: AnalysisReport,
    pub competitor_analyses: Vec<CompetitorEntry>,
    pub average_score: Option<i32>,
    pub competitor_count: usize,
}

pub(in crate::api) async fn run_competitor_analysis(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Json(body): Json<CompetitorsBody>,
) -> Result<Json<ApiResponse<CompetitionData>>, ApiError> {
    let audit = resolve_audit(&state.pool, &id, &req_id.0).await?;
    let business = vizaudit_db::get_business(&state.pool, audit.business_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "business not found"))?;

    require_places(&state, &req_id.0)?;

    let search_query = build_search_query(&body, &business);
    let analysis_id =
        vizaudit_db::create_competitor_analysis(&state.pool, audit.id, &search_query)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    match compare_against_market(&state, &req_id.0, &business, &search_query, analysis_id).await {
        Ok(data) => Ok(Json(ApiResponse {
            data,
            meta: ResponseMeta::new(req_id.0),
        })),
        Err(api_error) => {
            if let Err(e) = vizaudit_db::fail_competitor_analysis(&state.pool, analysis_id).await {
                tracing::error!(error = %e, analysis_id, "failed to mark analysis as failed");
            }
            Err(api_error)
        }
    }
}

/// Score the audited business, then discover and score its competitors.
async fn compare_against_market(
    state: &AppState,
    request_id: &str,
    business: &BusinessRow,
    search_query: &str,
    analysis_id: i64,
) -> Result<CompetitionData, ApiError> {
    let places = require_places(state, request_id)?;

    tracing::info!(business = %business.name, search_query, "competitor analysis started");

    let your_analysis = run_full_analysis(
        state,
        request_id,
        &business.place_id,
        &business.name,
        business.website.as_deref(),
        None,
    )
    .await?;

    let location_bias = business
        .latitude
        .zip(business.longitude);
    let candidates = places
        .text_search(search_query, location_bias, None)
        .await
        .map_err(|e| map_places_error(request_id.to_owned(), &e))?;

    let own_name = business.name.to_lowercase();
    let competitors: Vec<_> = candidates
        .into_iter()
        .filter(|c| c.place_id != business.place_id && c.name.to_lowercase() != own_name)
        .take(state.config.competitor_limit)
        .collect();

    // One at a time: each competitor costs several collaborator calls, and a
    // burst would trip the provider's rate limits.
    let mut entries = Vec::with_capacity(competitors.len());
    for candidate in competitors {
        let analysis = run_full_analysis(
            state,
            request_id,
            &candidate.place_id,
            &candidate.name,
            None,
            None,
        )
        .await?;

        let rating = analysis
            .places
            .as_ref()
            .and_then(|p| p.rating)
            .or(candidate.rating);
        let review_count = analysis
            .places
            .as_ref()
            .map_or(candidate.review_count, |p| p.review_count);

        vizaudit_db::insert_competitor_result(
            &state.pool,
            &NewCompetitorResult {
                competitor_analysis_id: analysis_id,
                place_id: &candidate.place_id,
                name: &candidate.name,
                address: &candidate.address,
                rating,
                review_count: i32::try_from(review_count).unwrap_or(i32::MAX),
                overall_score: i32::from(analysis.overall_score),
            },
        )
        .await
        .map_err(|e| map_db_error(request_id.to_owned(), &e))?;

        entries.push(CompetitorEntry {
            place_id: candidate.place_id,
            name: candidate.name,
            address: candidate.address,
            analysis,
        });
    }

    let average_score = average(entries.iter().map(|e| i32::from(e.analysis.overall_score)));

    vizaudit_db::complete_competitor_analysis(
        &state.pool,
        analysis_id,
        i32::try_from(entries.len()).unwrap_or(i32::MAX),
        average_score,
    )
    .await
    .map_err(|e| map_db_error(request_id.to_owned(), &e))?;

    tracing::info!(
        analysis_id,
        competitor_count = entries.len(),
        ?average_score,
        "competitor analysis complete"
    );

    Ok(CompetitionData {
        analysis_id,
        search_query: search_query.to_owned(),
        your_analysis,
        competitor_count: entries.len(),
        competitor_analyses: entries,
        average_score,
    })
}

/// Keywords beat an explicit category, which beats the stored one.
fn build_search_query(body: &CompetitorsBody, business: &BusinessRow) -> String {
    let base = [&body.keywords, &body.category, &business.category]
        .into_iter()
        .flatten()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .unwrap_or("business")
        .to_owned();

    match &body.location {
        Some(location) if !location.trim().is_empty() => {
            format!("{base} in {}", location.trim())
        }
        _ => base,
    }
}

fn average(scores: impl Iterator<Item = i32>) -> Option<i32> {
    let collected: Vec<i32> = scores.collect();
    if collected.is_empty() {
        return None;
    }
    let sum: i64 = collected.iter().copied().map(i64::from).sum();
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    let avg = (sum as f64 / collected.len() as f64).round() as i32;
    Some(avg)
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct StoredAnalysisView {
    pub analysis_id: i64,
    pub status: String,
    pub search_query: Option<String>,
    pub competitor_count: i32,
    pub average_competitor_score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct StoredCompetitorView {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub rating: Option<f64>,
    pub review_count: i32,
    pub overall_score: i32,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct StoredCompetitionData {
    pub analysis: StoredAnalysisView,
    pub competitors: Vec<StoredCompetitorView>,
}

pub(in crate::api) async fn get_competitor_analysis(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<StoredCompetitionData>>, ApiError> {
    let audit = resolve_audit(&state.pool, &id, &req_id.0).await?;

    let analysis = vizaudit_db::latest_competitor_analysis(&state.pool, audit.id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(req_id.0.clone(), "not_found", "no competitor analysis yet")
        })?;

    let competitors = vizaudit_db::list_competitor_results(&state.pool, analysis.id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: StoredCompetitionData {
            analysis: StoredAnalysisView {
                analysis_id: analysis.id,
                status: analysis.status,
                search_query: analysis.search_query,
                competitor_count: analysis.competitor_count,
                average_competitor_score: analysis.average_competitor_score,
                created_at: analysis.created_at,
                completed_at: analysis.completed_at,
            },
            competitors: competitors
                .into_iter()
                .map(|c| StoredCompetitorView {
                    place_id: c.place_id,
                    name: c.name,
                    address: c.address,
                    rating: c.rating,
                    review_count: c.review_count,
                    overall_score: c.overall_score,
                })
                .collect(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
