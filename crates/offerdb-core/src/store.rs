//! Collaborator contracts for persistence and offer fetching.
//!
//! Futures are `Send` so implementations can be driven from `axum` handlers.

use std::future::Future;

use thiserror::Error;

use crate::offers::{OfferRecord, ScrapedOffer};

/// Failure modes of an offer fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The fetch mechanism itself failed (spawn failure, non-zero exit, timeout).
    #[error("offer fetch failed: {0}")]
    Process(String),

    /// The fetch ran but reported no offer for this query.
    #[error("{0}")]
    Application(String),

    /// The fetch produced output that is not a valid offer payload.
    /// `raw` is kept for logging and must not be returned to API callers.
    #[error("offer fetch produced unparseable output")]
    Parse { raw: String },
}

/// Storage for offer records.
pub trait OfferStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// First record (in storage order) whose name contains `name`,
    /// case-insensitively and literally.
    fn find_by_fuzzy_name(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<OfferRecord>, Self::Error>> + Send;

    /// Creates the record when `record.id` is `None`, otherwise overwrites the
    /// stored document. Returns the record as persisted, with `id` set.
    fn upsert(
        &self,
        record: OfferRecord,
    ) -> impl Future<Output = Result<OfferRecord, Self::Error>> + Send;
}

/// Source of fresh offers for a restaurant.
pub trait OfferFetcher {
    fn fetch(
        &self,
        name: &str,
        city: &str,
    ) -> impl Future<Output = Result<ScrapedOffer, FetchError>> + Send;
}
