//! Database operations for the `directory_listings` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `directory_listings` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DirectoryListingRow {
    pub id: i64,
    pub audit_id: i64,
    pub directory: String,
    pub status: String,
    pub external_url: Option<String>,
    pub found_name: Option<String>,
    pub found_address: Option<String>,
    pub found_phone: Option<String>,
    pub found_rating: Option<f64>,
    pub found_review_count: Option<i32>,
    pub created_at: DateTime<Utc>,
}

pub struct NewDirectoryListing<'a> {
    pub directory: &'a str,
    pub status: &'a str,
    pub external_url: Option<&'a str>,
    pub found_name: Option<&'a str>,
    pub found_address: Option<&'a str>,
    pub found_phone: Option<&'a str>,
    pub found_rating: Option<f64>,
    pub found_review_count: Option<i32>,
}

/// Replace the directory listings recorded for an audit.
///
/// Deletes any rows from a previous scan, then inserts the new set inside a
/// transaction so a rescan never leaves a mixed result.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn replace_directory_listings(
    pool: &PgPool,
    audit_id: i64,
    listings: &[NewDirectoryListing<'_>],
) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM directory_listings WHERE audit_id = $1")
        .bind(audit_id)
        .execute(&mut *tx)
        .await?;

    for listing in listings {
        sqlx::query(
            "INSERT INTO directory_listings \
               (audit_id, directory, status, external_url, found_name, found_address, \
                found_phone, found_rating, found_review_count) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(audit_id)
        .bind(listing.directory)
        .bind(listing.status)
        .bind(listing.external_url)
        .bind(listing.found_name)
        .bind(listing.found_address)
        .bind(listing.found_phone)
        .bind(listing.found_rating)
        .bind(listing.found_review_count)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// List the directory listings recorded for an audit, by directory name.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn list_directory_listings(
    pool: &PgPool,
    audit_id: i64,
) -> Result<Vec<DirectoryListingRow>, DbError> {
    Ok(sqlx::query_as::<_, DirectoryListingRow>(
        "SELECT id, audit_id, directory, status, external_url, found_name, found_address, \
                found_phone, found_rating, found_review_count, created_at \
         FROM directory_listings \
         WHERE audit_id = $1 \
         ORDER BY directory",
    )
    .bind(audit_id)
    .fetch_all(pool)
    .await?)
}
