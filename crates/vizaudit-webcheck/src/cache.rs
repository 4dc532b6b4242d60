//! Time-windowed cache in front of the website checker.
//!
//! Keyed by normalized URL. A row is fresh while it is younger than the
//! configured window; staleness is decided at read time and stale rows are
//! simply overwritten by the next successful check. Concurrent checks for
//! the same URL race as last-writer-wins upserts, which both converge to an
//! equivalent row.

use sqlx::PgPool;

use vizaudit_core::WebsiteProfile;
use vizaudit_db::{DbError, NewWebsiteCacheEntry};

use crate::normalize::normalize_url;
use crate::WebsiteChecker;

/// A website profile plus where it came from.
#[derive(Debug, Clone)]
pub struct CachedWebsite {
    /// The normalized URL that keys the cache row.
    pub url: String,
    pub profile: WebsiteProfile,
    pub accessibility_score: Option<u8>,
    pub best_practices_score: Option<u8>,
    /// `true` when served from a fresh cache row without running the checker.
    pub cached: bool,
}

/// Serve a website profile from cache, or run `checker` and record the result.
///
/// 1. Normalizes `raw_url` into the cache key.
/// 2. Unless `skip_cache`, returns a cache row younger than `freshness_days`
///    tagged `cached = true`. Hit/miss is binary on the window boundary.
/// 3. Otherwise runs the checker. A successful check is upserted with a new
///    `updated_at`; a failed one (the analysis carries an error) is returned
///    as-is so scoring still works, but is not written — a transient outage
///    must not occupy the cache for a whole window.
///
/// # Errors
///
/// Returns [`DbError`] only for cache-store failures. Checker failures never
/// propagate; they degrade to a not-accessible profile.
pub async fn get_or_compute<C: WebsiteChecker>(
    pool: &PgPool,
    raw_url: &str,
    skip_cache: bool,
    freshness_days: i32,
    checker: &C,
) -> Result<CachedWebsite, DbError> {
    let url = normalize_url(raw_url);

    if !skip_cache {
        if let Some(row) = vizaudit_db::get_fresh_website_cache(pool, &url, freshness_days).await? {
            tracing::debug!(%url, "website check served from cache");
            return Ok(CachedWebsite {
                url,
                profile: row.profile(),
                accessibility_score: row.accessibility_score.and_then(|s| u8::try_from(s).ok()),
                best_practices_score: row
                    .best_practices_score
                    .and_then(|s| u8::try_from(s).ok()),
                cached: true,
            });
        }
    }

    // The checker receives the caller's URL so an explicit http scheme is
    // probed as given; only the cache key collapses scheme variants.
    let analysis = checker.check(raw_url).await;

    if analysis.error.is_none() {
        vizaudit_db::upsert_website_cache(
            pool,
            &NewWebsiteCacheEntry {
                url: &url,
                accessible: analysis.accessible,
                has_ssl: analysis.has_ssl,
                speed_score: analysis.speed_score.map(i32::from),
                seo_score: analysis.seo_score.map(i32::from),
                accessibility_score: analysis.accessibility_score.map(i32::from),
                best_practices_score: analysis.best_practices_score.map(i32::from),
            },
        )
        .await?;
    } else {
        tracing::warn!(%url, "website check failed; returning degraded profile uncached");
    }

    Ok(CachedWebsite {
        url,
        profile: analysis.profile(),
        accessibility_score: analysis.accessibility_score,
        best_practices_score: analysis.best_practices_score,
        cached: false,
    })
}
