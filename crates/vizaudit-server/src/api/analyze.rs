//! Full triple-signal analysis: places + social + website → overall score.

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use vizaudit_core::{scoring, PlacesProfile, SocialSnapshot, WebsiteProfile};
use vizaudit_places::PlaceDetails;
use vizaudit_social::{ad_library_url, analyze_social_presence};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct AnalyzeBody {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct PlacesBlock {
    pub rating: Option<f64>,
    pub review_count: u32,
    pub photos_count: u32,
    pub has_website: bool,
    pub maps_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct SocialBlock {
    pub facebook_followers: Option<u32>,
    pub facebook_posts_monthly: Option<u32>,
    pub facebook_engagement: Option<f64>,
    pub facebook_has_ads: bool,
    pub instagram_followers: Option<u32>,
    pub instagram_posts_monthly: Option<u32>,
    pub instagram_engagement: Option<f64>,
    pub instagram_has_ads: bool,
    pub social_score: u8,
    pub is_active: bool,
    pub ads_running: bool,
    pub ad_library_url: String,
    /// The social figures are estimated, not fetched from platform APIs.
    pub estimated: bool,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct WebsiteBlock {
    pub url: String,
    pub accessible: bool,
    pub has_ssl: bool,
    pub speed_score: Option<u8>,
    pub seo_score: Option<u8>,
    pub cached: bool,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct AnalysisReport {
    pub business_name: String,
    pub places: Option<PlacesBlock>,
    pub social: SocialBlock,
    pub website: Option<WebsiteBlock>,
    pub overall_score: u8,
}

pub(in crate::api) async fn analyze_business(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<AnalyzeBody>,
) -> Result<Json<ApiResponse<AnalysisReport>>, ApiError> {
    if body.place_id.trim().is_empty() || body.name.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "place_id and name are required",
        ));
    }

    let report = run_full_analysis(
        &state,
        &req_id.0,
        &body.place_id,
        &body.name,
        body.website.as_deref(),
        body.country.as_deref(),
    )
    .await?;

    Ok(Json(ApiResponse {
        data: report,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Gather all three signals for one business and compute its overall score.
///
/// Collaborator failures degrade: a missing or unreachable places provider
/// yields no places block, an unreachable website yields a not-accessible
/// profile. Only cache-store failures abort the request.
pub(in crate::api) async fn run_full_analysis(
    state: &AppState,
    request_id: &str,
    place_id: &str,
    name: &str,
    website: Option<&str>,
    country: Option<&str>,
) -> Result<AnalysisReport, ApiError> {
    let details = fetch_place_details(state, place_id).await;

    let website_url = website
        .map(ToOwned::to_owned)
        .or_else(|| details.as_ref().and_then(|d| d.website.clone()));

    let social = match analyze_social_presence(state.social.as_ref(), name, website_url.as_deref())
        .await
    {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(error = %e, business = name, "social analysis failed; scoring without it");
            empty_social_snapshot()
        }
    };

    let website_check = match &website_url {
        Some(url) => Some(
            vizaudit_webcheck::get_or_compute(
                &state.pool,
                url,
                false,
                state.config.cache_freshness_days,
                state.checker.as_ref(),
            )
            .await
            .map_err(|e| map_db_error(request_id.to_owned(), &e))?,
        ),
        None => None,
    };

    let places_profile: Option<PlacesProfile> = details.as_ref().map(PlaceDetails::places_profile);
    let website_profile: Option<WebsiteProfile> =
        website_check.as_ref().map(|c| c.profile.clone());

    let overall_score = scoring::visibility_score(
        places_profile.as_ref(),
        &social,
        website_profile.as_ref(),
    );

    let country = country
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| state.config.default_country.clone());

    Ok(AnalysisReport {
        business_name: name.to_owned(),
        places: details.as_ref().map(|d| PlacesBlock {
            rating: d.rating,
            review_count: d.review_count,
            photos_count: d.photos_count,
            has_website: d.website.is_some(),
            maps_url: d.maps_url.clone(),
        }),
        social: SocialBlock {
            facebook_followers: social.facebook.followers,
            facebook_posts_monthly: social.facebook.posts_last_30_days,
            facebook_engagement: social.facebook.engagement_rate,
            facebook_has_ads: social.facebook.has_active_ads,
            instagram_followers: social.instagram.followers,
            instagram_posts_monthly: social.instagram.posts_last_30_days,
            instagram_engagement: social.instagram.engagement_rate,
            instagram_has_ads: social.instagram.has_active_ads,
            social_score: social.social_score,
            is_active: social.is_active,
            ads_running: social.ads_running,
            ad_library_url: ad_library_url(name, &country),
            estimated: true,
        },
        website: website_check.map(|c| WebsiteBlock {
            url: c.url,
            accessible: c.profile.accessible,
            has_ssl: c.profile.has_ssl,
            speed_score: c.profile.speed_score,
            seo_score: c.profile.seo_score,
            cached: c.cached,
        }),
        overall_score,
    })
}

/// Fetch place details, degrading any provider problem to `None`.
async fn fetch_place_details(state: &AppState, place_id: &str) -> Option<PlaceDetails> {
    let places = state.places.as_ref()?;
    match places.place_details(place_id).await {
        Ok(details) => Some(details),
        Err(e) => {
            tracing::warn!(error = %e, place_id, "place details unavailable; scoring without them");
            None
        }
    }
}

fn empty_social_snapshot() -> SocialSnapshot {
    use vizaudit_core::{Platform, PlatformProfile};
    SocialSnapshot::from_platforms(
        PlatformProfile::not_found(Platform::Facebook),
        PlatformProfile::not_found(Platform::Instagram),
        chrono::Utc::now(),
    )
}
