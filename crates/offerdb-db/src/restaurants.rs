//! Database operations for the `restaurants` table.
//!
//! Each row is one cached offer document: location, provider ids and the
//! ordered offer list are written together in a single statement.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use offerdb_core::{fold_name, Location, Offer, OfferRecord};
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `restaurants` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RestaurantRow {
    pub id: i64,
    pub public_id: Uuid,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub external_ids: Json<BTreeMap<String, String>>,
    pub cached_offers: Json<Vec<Offer>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RestaurantRow> for OfferRecord {
    fn from(row: RestaurantRow) -> Self {
        let location = match (row.latitude, row.longitude) {
            (Some(lat), Some(lng)) => Some(Location { lat, lng }),
            _ => None,
        };
        Self {
            id: Some(row.public_id),
            name: row.name,
            location,
            external_ids: row.external_ids.0,
            offers: row.cached_offers.0,
        }
    }
}

const RESTAURANT_COLUMNS: &str = "id, public_id, name, latitude, longitude, external_ids, \
                                  cached_offers, created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns the first restaurant (by insertion order) whose name contains
/// `name`, compared case-insensitively.
///
/// `name` is matched as a literal substring of the stored folded name, so
/// `%`, `_` and other pattern characters carry no special meaning and case
/// folding follows [`fold_name`] rather than the database collation.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_restaurant_by_fuzzy_name(
    pool: &PgPool,
    name: &str,
) -> Result<Option<RestaurantRow>, DbError> {
    let row = sqlx::query_as::<_, RestaurantRow>(&format!(
        "SELECT {RESTAURANT_COLUMNS} \
         FROM restaurants \
         WHERE strpos(name_folded, $1) > 0 \
         ORDER BY id \
         LIMIT 1"
    ))
    .bind(fold_name(name))
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns every restaurant whose name contains `name`, in insertion order,
/// capped at `limit` rows.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_restaurants_by_fuzzy_name(
    pool: &PgPool,
    name: &str,
    limit: i64,
) -> Result<Vec<RestaurantRow>, DbError> {
    let rows = sqlx::query_as::<_, RestaurantRow>(&format!(
        "SELECT {RESTAURANT_COLUMNS} \
         FROM restaurants \
         WHERE strpos(name_folded, $1) > 0 \
         ORDER BY id \
         LIMIT $2"
    ))
    .bind(fold_name(name))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Writes `record` as one document.
///
/// A record without an id is inserted under a freshly generated public id.
/// A record with an id overwrites name, location, provider ids and offers of
/// that row; if the row no longer exists it is recreated under the same id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails.
pub async fn upsert_restaurant(
    pool: &PgPool,
    record: &OfferRecord,
) -> Result<RestaurantRow, DbError> {
    let public_id = record.id.unwrap_or_else(Uuid::new_v4);

    let row = sqlx::query_as::<_, RestaurantRow>(&format!(
        "INSERT INTO restaurants \
             (public_id, name, name_folded, latitude, longitude, external_ids, cached_offers) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (public_id) DO UPDATE SET \
             name          = EXCLUDED.name, \
             name_folded   = EXCLUDED.name_folded, \
             latitude      = EXCLUDED.latitude, \
             longitude     = EXCLUDED.longitude, \
             external_ids  = EXCLUDED.external_ids, \
             cached_offers = EXCLUDED.cached_offers, \
             updated_at    = NOW() \
         RETURNING {RESTAURANT_COLUMNS}"
    ))
    .bind(public_id)
    .bind(&record.name)
    .bind(fold_name(&record.name))
    .bind(record.location.map(|l| l.lat))
    .bind(record.location.map(|l| l.lng))
    .bind(Json(&record.external_ids))
    .bind(Json(&record.offers))
    .fetch_one(pool)
    .await?;

    Ok(row)
}
