//! Database operations for the `businesses` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

/// A row from the `businesses` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BusinessRow {
    pub id: i64,
    pub public_id: Uuid,
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub category: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewBusiness<'a> {
    pub place_id: &'a str,
    pub name: &'a str,
    pub address: &'a str,
    pub phone: Option<&'a str>,
    pub website: Option<&'a str>,
    pub category: Option<&'a str>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Upsert a business by its provider place ID. Returns the internal ID.
///
/// On conflict the identity fields are refreshed from the new snapshot;
/// `COALESCE` keeps previously stored contact details when the provider
/// omits them in a later fetch.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn upsert_business(pool: &PgPool, business: &NewBusiness<'_>) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO businesses \
           (place_id, name, address, phone, website, category, latitude, longitude) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (place_id) DO UPDATE SET \
           name       = EXCLUDED.name, \
           address    = EXCLUDED.address, \
           phone      = COALESCE(EXCLUDED.phone,    businesses.phone), \
           website    = COALESCE(EXCLUDED.website,  businesses.website), \
           category   = COALESCE(EXCLUDED.category, businesses.category), \
           latitude   = COALESCE(EXCLUDED.latitude,  businesses.latitude), \
           longitude  = COALESCE(EXCLUDED.longitude, businesses.longitude), \
           updated_at = NOW() \
         RETURNING id",
    )
    .bind(business.place_id)
    .bind(business.name)
    .bind(business.address)
    .bind(business.phone)
    .bind(business.website)
    .bind(business.category)
    .bind(business.latitude)
    .bind(business.longitude)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Fetch a business by internal ID.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn get_business(pool: &PgPool, id: i64) -> Result<Option<BusinessRow>, DbError> {
    Ok(sqlx::query_as::<_, BusinessRow>(
        "SELECT id, public_id, place_id, name, address, phone, website, category, \
                latitude, longitude, created_at, updated_at \
         FROM businesses WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?)
}

/// Fetch a business by its provider place ID.
///
/// # Errors
///
/// Returns `DbError` on database query failure.
pub async fn get_business_by_place_id(
    pool: &PgPool,
    place_id: &str,
) -> Result<Option<BusinessRow>, DbError> {
    Ok(sqlx::query_as::<_, BusinessRow>(
        "SELECT id, public_id, place_id, name, address, phone, website, category, \
                latitude, longitude, created_at, updated_at \
         FROM businesses WHERE place_id = $1",
    )
    .bind(place_id)
    .fetch_optional(pool)
    .await?)
}
