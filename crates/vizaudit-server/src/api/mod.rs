mod analyze;
mod audits;
mod businesses;
mod competitors;
mod scan;
mod website;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use vizaudit_core::{AppConfig, DirectorySpec};
use vizaudit_places::PlacesClient;
use vizaudit_social::EstimatedSocialSource;
use vizaudit_webcheck::AuditChecker;

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    /// Absent when no provider key is configured; handlers degrade or 503.
    pub places: Option<Arc<PlacesClient>>,
    pub checker: Arc<AuditChecker>,
    pub social: Arc<EstimatedSocialSource>,
    pub directories: Arc<Vec<DirectorySpec>>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "unavailable" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_db_error(request_id: String, error: &vizaudit_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

/// The places client, or a 503 when no provider key is configured.
///
/// Missing configuration is treated like any other collaborator outage.
pub(super) fn require_places<'a>(
    state: &'a AppState,
    request_id: &str,
) -> Result<&'a Arc<PlacesClient>, ApiError> {
    state.places.as_ref().ok_or_else(|| {
        ApiError::new(
            request_id.to_owned(),
            "unavailable",
            "places provider is not configured",
        )
    })
}

/// Resolve an audit by its public UUID, mapping absence to a 404.
pub(super) async fn resolve_audit(
    pool: &PgPool,
    id: &str,
    request_id: &str,
) -> Result<vizaudit_db::AuditRow, ApiError> {
    let public_id = Uuid::parse_str(id).map_err(|_| {
        ApiError::new(
            request_id.to_owned(),
            "validation_error",
            "audit id must be a UUID",
        )
    })?;

    vizaudit_db::get_audit_by_public_id(pool, public_id)
        .await
        .map_err(|e| map_db_error(request_id.to_owned(), &e))?
        .ok_or_else(|| ApiError::new(request_id.to_owned(), "not_found", "audit not found"))
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

fn audit_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/businesses/search",
            get(businesses::search_businesses),
        )
        .route(
            "/api/v1/businesses/{place_id}",
            get(businesses::get_business),
        )
        .route("/api/v1/audits", post(audits::create_audit))
        .route(
            "/api/v1/audits/{id}",
            get(audits::get_audit).put(audits::update_audit),
        )
        .route("/api/v1/analyze", post(analyze::analyze_business))
        .route(
            "/api/v1/website-analysis",
            post(website::analyze_website),
        )
        .route(
            "/api/v1/audits/{id}/competitors",
            post(competitors::run_competitor_analysis).get(competitors::get_competitor_analysis),
        )
        .route("/api/v1/scan", post(scan::scan_directories))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(audit_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match vizaudit_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use std::path::PathBuf;
    use vizaudit_core::Environment;

    pub fn test_config() -> AppConfig {
        AppConfig {
            database_url: "postgres://unused".to_string(),
            env: Environment::Test,
            bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
            log_level: "info".to_string(),
            directories_path: PathBuf::from("./config/directories.yaml"),
            places_api_key: None,
            pagespeed_api_key: None,
            default_country: "MT".to_string(),
            db_max_connections: 5,
            db_min_connections: 1,
            db_acquire_timeout_secs: 5,
            webcheck_timeout_secs: 2,
            webcheck_user_agent: "test-agent".to_string(),
            cache_freshness_days: 7,
            places_timeout_secs: 2,
            places_max_retries: 0,
            places_retry_backoff_base_ms: 0,
            competitor_limit: 5,
        }
    }

    /// App wired with no places provider and an empty directory roster.
    pub fn test_app(pool: PgPool) -> Router {
        test_app_with_directories(pool, Vec::new())
    }

    /// App wired with no places provider and the given directory roster.
    pub fn test_app_with_directories(pool: PgPool, directories: Vec<DirectorySpec>) -> Router {
        let checker = AuditChecker::from_app_config(&test_config()).expect("checker construction");
        let state = AppState {
            pool,
            config: Arc::new(test_config()),
            places: None,
            checker: Arc::new(checker),
            social: Arc::new(EstimatedSocialSource),
            directories: Arc::new(directories),
        };
        build_app(state, default_rate_limit_state())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    use super::test_support::test_app;

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_unavailable_maps_to_503() {
        let response =
            ApiError::new("req-1", "unavailable", "places provider is not configured")
                .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn api_error_unknown_code_maps_to_500() {
        let response = ApiError::new("req-1", "internal_error", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn health_returns_ok_with_live_database(pool: PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
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
        assert_eq!(json["data"]["status"].as_str(), Some("ok"));
        assert!(json["meta"]["request_id"].is_string());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn search_without_provider_key_returns_503(pool: PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/businesses/search?query=bakery")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn request_id_header_is_echoed(pool: PgPool) {
        let app = test_app(pool);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .header("x-request-id", "req-from-client")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok()),
            Some("req-from-client")
        );
    }
}
