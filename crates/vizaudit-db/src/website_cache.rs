//! Database operations for the `website_cache` table.
//!
//! One row per normalized URL, overwritten on every successful fresh check.
//! Staleness is a read-time predicate over `updated_at`; stale rows are
//! ignored by [`get_fresh_website_cache`] and replaced by the next write —
//! never deleted.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use vizaudit_core::WebsiteProfile;

use crate::DbError;

/// A row from the `website_cache` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WebsiteCacheRow {
    pub url: String,
    pub accessible: bool,
    pub has_ssl: bool,
    pub speed_score: Option<i32>,
    pub seo_score: Option<i32>,
    pub accessibility_score: Option<i32>,
    pub best_practices_score: Option<i32>,
    pub updated_at: DateTime<Utc>,
}

impl WebsiteCacheRow {
    /// The scorer-facing view of this cache row.
    #[must_use]
    pub fn profile(&self) -> WebsiteProfile {
        WebsiteProfile {
            accessible: self.accessible,
            has_ssl: self.has_ssl,
            speed_score: self.speed_score.and_then(|s| u8::try_from(s).ok()),
            seo_score: self.seo_score.and_then(|s| u8::try_from(s).ok()),
        }
    }
}

pub struct NewWebsiteCacheEntry<'a> {
    pub url: &'a str,
    pub accessible: bool,
    pub has_ssl: bool,
    pub speed_score: Option<i32>,
    pub seo_score: Option<i32>,
    pub accessibility_score: Option<i32>,
    pub best_practices_score: Option<i32>,
}

/// Fetch the cache row for a normalized URL if it is younger than
/// `max_age_days`.
///
/// Returns `None` for both a missing row and a stale one — the caller cannot
/// tell the difference and does not need to.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn get_fresh_website_cache(
    pool: &PgPool,
    url: &str,
    max_age_days: i32,
) -> Result<Option<WebsiteCacheRow>, DbError> {
    Ok(sqlx::query_as::<_, WebsiteCacheRow>(
        "SELECT url, accessible, has_ssl, speed_score, seo_score, \
                accessibility_score, best_practices_score, updated_at \
         FROM website_cache \
         WHERE url = $1 AND updated_at > NOW() - make_interval(days => $2)",
    )
    .bind(url)
    .bind(max_age_days)
    .fetch_optional(pool)
    .await?)
}

/// Upsert the cache row for a normalized URL, stamping `updated_at`.
///
/// Last writer wins: concurrent checks for the same URL converge on whichever
/// result lands last, which is acceptable since both ran the same check.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn upsert_website_cache(
    pool: &PgPool,
    entry: &NewWebsiteCacheEntry<'_>,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO website_cache \
           (url, accessible, has_ssl, speed_score, seo_score, \
            accessibility_score, best_practices_score, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, NOW()) \
         ON CONFLICT (url) DO UPDATE SET \
           accessible           = EXCLUDED.accessible, \
           has_ssl              = EXCLUDED.has_ssl, \
           speed_score          = EXCLUDED.speed_score, \
           seo_score            = EXCLUDED.seo_score, \
           accessibility_score  = EXCLUDED.accessibility_score, \
           best_practices_score = EXCLUDED.best_practices_score, \
           updated_at           = NOW()",
    )
    .bind(entry.url)
    .bind(entry.accessible)
    .bind(entry.has_ssl)
    .bind(entry.speed_score)
    .bind(entry.seo_score)
    .bind(entry.accessibility_score)
    .bind(entry.best_practices_score)
    .execute(pool)
    .await?;
    Ok(())
}
