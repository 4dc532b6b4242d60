//! Audit lifecycle: create, fetch, and record results.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vizaudit_db::{NewBusiness, NewDirectoryListing};

use crate::middleware::RequestId;

use super::{map_db_error, resolve_audit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(in crate::api) struct CreateAuditBody {
    pub place_id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct CreatedAudit {
    pub audit_id: Uuid,
    pub business_id: Uuid,
}

pub(in crate::api) async fn create_audit(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateAuditBody>,
) -> Result<Json<ApiResponse<CreatedAudit>>, ApiError> {
    if body.place_id.trim().is_empty() || body.name.trim().is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "place_id and name are required",
        ));
    }

    let business_id = vizaudit_db::upsert_business(
        &state.pool,
        &NewBusiness {
            place_id: &body.place_id,
            name: &body.name,
            address: body.address.as_deref().unwrap_or(""),
            phone: body.phone.as_deref(),
            website: body.website.as_deref(),
            category: body.category.as_deref(),
            latitude: body.latitude,
            longitude: body.longitude,
        },
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let business = vizaudit_db::get_business(&state.pool, business_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "internal_error", "business vanished"))?;

    let audit = vizaudit_db::create_audit(&state.pool, business_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    tracing::info!(audit_id = %audit.public_id, business = %body.name, "audit created");

    Ok(Json(ApiResponse {
        data: CreatedAudit {
            audit_id: audit.public_id,
            business_id: business.public_id,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct AuditView {
    pub id: Uuid,
    pub status: String,
    pub overall_score: Option<i32>,
    pub listings_score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct BusinessView {
    pub id: Uuid,
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub category: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct ListingView {
    pub directory: String,
    pub status: String,
    pub external_url: Option<String>,
    pub found_name: Option<String>,
    pub found_address: Option<String>,
    pub found_phone: Option<String>,
    pub found_rating: Option<f64>,
    pub found_review_count: Option<i32>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct AuditDetail {
    pub audit: AuditView,
    pub business: BusinessView,
    pub listings: Vec<ListingView>,
}

pub(in crate::api) async fn get_audit(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AuditDetail>>, ApiError> {
    let audit = resolve_audit(&state.pool, &id, &req_id.0).await?;

    let business = vizaudit_db::get_business(&state.pool, audit.business_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "business not found"))?;

    let listings = vizaudit_db::list_directory_listings(&state.pool, audit.id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: AuditDetail {
            audit: AuditView {
                id: audit.public_id,
                status: audit.status,
                overall_score: audit.overall_score,
                listings_score: audit.listings_score,
                created_at: audit.created_at,
                completed_at: audit.completed_at,
            },
            business: BusinessView {
                id: business.public_id,
                place_id: business.place_id,
                name: business.name,
                address: business.address,
                phone: business.phone,
                website: business.website,
                category: business.category,
                latitude: business.latitude,
                longitude: business.longitude,
            },
            listings: listings
                .into_iter()
                .map(|l| ListingView {
                    directory: l.directory,
                    status: l.status,
                    external_url: l.external_url,
                    found_name: l.found_name,
                    found_address: l.found_address,
                    found_phone: l.found_phone,
                    found_rating: l.found_rating,
                    found_review_count: l.found_review_count,
                })
                .collect(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct ListingUpdate {
    pub directory: String,
    pub status: String,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default)]
    pub found_name: Option<String>,
    #[serde(default)]
    pub found_address: Option<String>,
    #[serde(default)]
    pub found_phone: Option<String>,
    #[serde(default)]
    pub found_rating: Option<f64>,
    #[serde(default)]
    pub found_review_count: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(in crate::api) struct UpdateAuditBody {
    #[serde(default)]
    pub overall_score: Option<i32>,
    #[serde(default)]
    pub listings_score: Option<i32>,
    pub status: String,
    #[serde(default)]
    pub directories: Vec<ListingUpdate>,
}

#[derive(Debug, Serialize)]
pub(in crate::api) struct UpdatedAudit {
    pub success: bool,
}

pub(in crate::api) async fn update_audit(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    Json(body): Json<UpdateAuditBody>,
) -> Result<Json<ApiResponse<UpdatedAudit>>, ApiError> {
    const ALLOWED_STATUSES: &[&str] = &["pending", "processing", "completed", "failed"];
    if !ALLOWED_STATUSES.contains(&body.status.as_str()) {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "status must be one of pending, processing, completed, failed",
        ));
    }

    let audit = resolve_audit(&state.pool, &id, &req_id.0).await?;

    vizaudit_db::update_audit_scores(
        &state.pool,
        audit.id,
        body.overall_score,
        body.listings_score,
        &body.status,
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    if !body.directories.is_empty() {
        let listings: Vec<NewDirectoryListing<'_>> = body
            .directories
            .iter()
            .map(|d| NewDirectoryListing {
                directory: &d.directory,
                status: &d.status,
                external_url: d.external_url.as_deref(),
                found_name: d.found_name.as_deref(),
                found_address: d.found_address.as_deref(),
                found_phone: d.found_phone.as_deref(),
                found_rating: d.found_rating,
                found_review_count: d.found_review_count,
            })
            .collect();

        vizaudit_db::replace_directory_listings(&state.pool, audit.id, &listings)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    }

    Ok(Json(ApiResponse {
        data: UpdatedAudit { success: true },
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::test_app;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use sqlx::PgPool;
    use tower::ServiceExt;

    async fn create_test_audit(app: &axum::Router) -> serde_json::Value {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/audits")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({
                            "place_id": "place-1",
                            "name": "Harbour Bakery",
                            "address": "1 Quay Street",
                            "website": "https://harbourbakery.example"
                        })
                        .to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn create_audit_returns_ids(pool: PgPool) {
        let app = test_app(pool);
        let json = create_test_audit(&app).await;
        assert!(json["data"]["audit_id"].is_string());
        assert!(json["data"]["business_id"].is_string());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn create_audit_requires_place_id(pool: PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/audits")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({"place_id": "", "name": "X"}).to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn repeat_audits_reuse_the_business(pool: PgPool) {
        let app = test_app(pool.clone());
        let first = create_test_audit(&app).await;
        let second = create_test_audit(&app).await;

        assert_eq!(first["data"]["business_id"], second["data"]["business_id"]);
        assert_ne!(first["data"]["audit_id"], second["data"]["audit_id"]);

        let businesses: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM businesses")
            .fetch_one(&pool)
            .await
            .expect("count businesses");
        assert_eq!(businesses, 1);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn get_audit_returns_business_and_listings(pool: PgPool) {
        let app = test_app(pool);
        let created = create_test_audit(&app).await;
        let audit_id = created["data"]["audit_id"].as_str().expect("audit id");

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/audits/{audit_id}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");
        assert_eq!(json["data"]["audit"]["status"].as_str(), Some("pending"));
        assert_eq!(
            json["data"]["business"]["name"].as_str(),
            Some("Harbour Bakery")
        );
        assert_eq!(json["data"]["listings"].as_array().map(Vec::len), Some(0));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn get_audit_returns_404_for_unknown_id(pool: PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/audits/00000000-0000-0000-0000-000000000000")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn get_audit_rejects_non_uuid_id(pool: PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/audits/not-a-uuid")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn update_audit_records_scores_and_listings(pool: PgPool) {
        let app = test_app(pool);
        let created = create_test_audit(&app).await;
        let audit_id = created["data"]["audit_id"].as_str().expect("audit id");

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/api/v1/audits/{audit_id}"))
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({
                            "overall_score": 72,
                            "listings_score": 67,
                            "status": "completed",
                            "directories": [
                                {"directory": "Maps", "status": "found", "found_name": "Harbour Bakery"},
                                {"directory": "Yelp", "status": "not_found"}
                            ]
                        })
                        .to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/audits/{audit_id}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json parse");

        assert_eq!(json["data"]["audit"]["status"].as_str(), Some("completed"));
        assert_eq!(json["data"]["audit"]["overall_score"].as_i64(), Some(72));
        assert_eq!(json["data"]["audit"]["listings_score"].as_i64(), Some(67));
        assert!(json["data"]["audit"]["completed_at"].is_string());
        assert_eq!(json["data"]["listings"].as_array().map(Vec::len), Some(2));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn update_audit_rejects_unknown_status(pool: PgPool) {
        let app = test_app(pool);
        let created = create_test_audit(&app).await;
        let audit_id = created["data"]["audit_id"].as_str().expect("audit id");

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/api/v1/audits/{audit_id}"))
                    .header("content-type", "application/json")
                    .body(Body::from(
                        serde_json::json!({"status": "done"}).to_string(),
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
