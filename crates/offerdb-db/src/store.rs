use offerdb_core::{OfferRecord, OfferStore};
use sqlx::PgPool;

use crate::{restaurants, DbError};

/// [`OfferStore`] backed by the `restaurants` table.
#[derive(Debug, Clone)]
pub struct PgOfferStore {
    pool: PgPool,
}

impl PgOfferStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl OfferStore for PgOfferStore {
    type Error = DbError;

    async fn find_by_fuzzy_name(&self, name: &str) -> Result<Option<OfferRecord>, DbError> {
        let row = restaurants::find_restaurant_by_fuzzy_name(&self.pool, name).await?;
        Ok(row.map(OfferRecord::from))
    }

    async fn upsert(&self, record: OfferRecord) -> Result<OfferRecord, DbError> {
        let row = restaurants::upsert_restaurant(&self.pool, &record).await?;
        tracing::debug!(
            public_id = %row.public_id,
            offers = row.cached_offers.0.len(),
            "restaurant offers written"
        );
        Ok(OfferRecord::from(row))
    }
}
