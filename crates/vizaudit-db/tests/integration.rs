//! Offline unit tests for vizaudit-db pool configuration and row types.
//! These tests do not require a live database connection.

use chrono::Utc;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use uuid::Uuid;
use vizaudit_core::{AppConfig, Environment};
use vizaudit_db::{AuditRow, PoolConfig, WebsiteCacheRow};

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        bind_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 3000),
        log_level: "info".to_string(),
        directories_path: PathBuf::from("./config/directories.yaml"),
        places_api_key: None,
        pagespeed_api_key: None,
        default_country: "MT".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        webcheck_timeout_secs: 10,
        webcheck_user_agent: "ua".to_string(),
        cache_freshness_days: 7,
        places_timeout_secs: 10,
        places_max_retries: 3,
        places_retry_backoff_base_ms: 1_000,
        competitor_limit: 5,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`AuditRow`] has all expected fields
/// with the correct types. No database required.
#[test]
fn audit_row_has_expected_fields() {
    let row = AuditRow {
        id: 1_i64,
        public_id: Uuid::new_v4(),
        business_id: 7_i64,
        status: "pending".to_string(),
        overall_score: None,
        listings_score: None,
        created_at: Utc::now(),
        completed_at: None,
    };

    assert_eq!(row.id, 1);
    assert_eq!(row.business_id, 7);
    assert_eq!(row.status, "pending");
    assert!(row.overall_score.is_none());
    assert!(row.completed_at.is_none());
}

#[test]
fn website_cache_row_converts_to_profile() {
    let row = WebsiteCacheRow {
        url: "https://example.com".to_string(),
        accessible: true,
        has_ssl: true,
        speed_score: Some(90),
        seo_score: Some(85),
        accessibility_score: Some(70),
        best_practices_score: None,
        updated_at: Utc::now(),
    };

    let profile = row.profile();
    assert!(profile.accessible);
    assert!(profile.has_ssl);
    assert_eq!(profile.speed_score, Some(90));
    assert_eq!(profile.seo_score, Some(85));
}

#[test]
fn website_cache_row_drops_out_of_range_scores() {
    let row = WebsiteCacheRow {
        url: "https://example.com".to_string(),
        accessible: true,
        has_ssl: false,
        speed_score: Some(-1),
        seo_score: Some(400),
        accessibility_score: None,
        best_practices_score: None,
        updated_at: Utc::now(),
    };

    let profile = row.profile();
    assert_eq!(profile.speed_score, None);
    assert_eq!(profile.seo_score, None);
}
