//! Database operations for competitor analyses and their result rows.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `competitor_analyses` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompetitorAnalysisRow {
    pub id: i64,
    pub audit_id: i64,
    pub status: String,
    pub search_query: Option<String>,
    pub competitor_count: i32,
    pub average_competitor_score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A row from the `competitor_results` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CompetitorResultRow {
    pub id: i64,
    pub competitor_analysis_id: i64,
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub rating: Option<f64>,
    pub review_count: i32,
    pub overall_score: i32,
    pub created_at: DateTime<Utc>,
}

pub struct NewCompetitorResult<'a> {
    pub competitor_analysis_id: i64,
    pub place_id: &'a str,
    pub name: &'a str,
    pub address: &'a str,
    pub rating: Option<f64>,
    pub review_count: i32,
    pub overall_score: i32,
}

/// Create a processing analysis record for an audit. Returns its ID.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn create_competitor_analysis(
    pool: &PgPool,
    audit_id: i64,
    search_query: &str,
) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO competitor_analyses (audit_id, status, search_query) \
         VALUES ($1, 'processing', $2) RETURNING id",
    )
    .bind(audit_id)
    .bind(search_query)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Mark an analysis completed with its aggregate stats.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn complete_competitor_analysis(
    pool: &PgPool,
    analysis_id: i64,
    competitor_count: i32,
    average_competitor_score: Option<i32>,
) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE competitor_analyses SET \
           status = 'completed', \
           competitor_count = $2, \
           average_competitor_score = $3, \
           completed_at = NOW() \
         WHERE id = $1",
    )
    .bind(analysis_id)
    .bind(competitor_count)
    .bind(average_competitor_score)
    .execute(pool)
    .await?;
    Ok(())
}

/// Mark an analysis failed.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn fail_competitor_analysis(pool: &PgPool, analysis_id: i64) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE competitor_analyses SET status = 'failed', completed_at = NOW() WHERE id = $1",
    )
    .bind(analysis_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Insert one scored competitor row. Returns its ID.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn insert_competitor_result(
    pool: &PgPool,
    result: &NewCompetitorResult<'_>,
) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO competitor_results \
           (competitor_analysis_id, place_id, name, address, rating, review_count, overall_score) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
    )
    .bind(result.competitor_analysis_id)
    .bind(result.place_id)
    .bind(result.name)
    .bind(result.address)
    .bind(result.rating)
    .bind(result.review_count)
    .bind(result.overall_score)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Fetch the most recent analysis for an audit, if any.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn latest_competitor_analysis(
    pool: &PgPool,
    audit_id: i64,
) -> Result<Option<CompetitorAnalysisRow>, DbError> {
    Ok(sqlx::query_as::<_, CompetitorAnalysisRow>(
        "SELECT id, audit_id, status, search_query, competitor_count, \
                average_competitor_score, created_at, completed_at \
         FROM competitor_analyses \
         WHERE audit_id = $1 \
         ORDER BY created_at DESC, id DESC \
         LIMIT 1",
    )
    .bind(audit_id)
    .fetch_optional(pool)
    .await?)
}

/// List the competitor rows for an analysis, best score first.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn list_competitor_results(
    pool: &PgPool,
    analysis_id: i64,
) -> Result<Vec<CompetitorResultRow>, DbError> {
    Ok(sqlx::query_as::<_, CompetitorResultRow>(
        "SELECT id, competitor_analysis_id, place_id, name, address, rating, \
                review_count, overall_score, created_at \
         FROM competitor_results \
         WHERE competitor_analysis_id = $1 \
         ORDER BY overall_score DESC, id",
    )
    .bind(analysis_id)
    .fetch_all(pool)
    .await?)
}
