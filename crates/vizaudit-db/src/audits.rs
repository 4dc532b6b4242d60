//! Database operations for the `audits` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `audits` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuditRow {
    pub id: i64,
    pub public_id: Uuid,
    pub business_id: i64,
    pub status: String,
    pub overall_score: Option<i32>,
    pub listings_score: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Create a new pending audit for a business.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn create_audit(pool: &PgPool, business_id: i64) -> Result<AuditRow, DbError> {
    Ok(sqlx::query_as::<_, AuditRow>(
        "INSERT INTO audits (business_id, status) VALUES ($1, 'pending') \
         RETURNING id, public_id, business_id, status, overall_score, listings_score, \
                   created_at, completed_at",
    )
    .bind(business_id)
    .fetch_one(pool)
    .await?)
}

/// Fetch an audit by its public UUID.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn get_audit_by_public_id(
    pool: &PgPool,
    public_id: Uuid,
) -> Result<Option<AuditRow>, DbError> {
    Ok(sqlx::query_as::<_, AuditRow>(
        "SELECT id, public_id, business_id, status, overall_score, listings_score, \
                created_at, completed_at \
         FROM audits WHERE public_id = $1",
    )
    .bind(public_id)
    .fetch_optional(pool)
    .await?)
}

/// Record scores and status on an audit.
///
/// `completed_at` is stamped when (and only when) the new status is
/// `completed`.
///
/// # Errors
///
/// Returns `DbError` on database query failure, or [`DbError::NotFound`] if
/// no audit with that ID exists.
pub async fn update_audit_scores(
    pool: &PgPool,
    audit_id: i64,
    overall_score: Option<i32>,
    listings_score: Option<i32>,
    status: &str,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE audits SET \
           overall_score  = $2, \
           listings_score = $3, \
           status         = $4, \
           completed_at   = CASE WHEN $4 = 'completed' THEN NOW() ELSE completed_at END \
         WHERE id = $1",
    )
    .bind(audit_id)
    .bind(overall_score)
    .bind(listings_score)
    .bind(status)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
